use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::{
    audit::log_audit,
    dto::auth::{LoginPayload, LoginRequest},
    entity::refresh_tokens,
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    services::token_service,
    state::AppState,
};

/// Verify credentials, mint the token pair and persist the refresh-token
/// record. The returned payload is what the client stores for the session.
pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginPayload> {
    let Some(username) = payload.username.filter(|u| !u.is_empty()) else {
        return Err(AppError::BadRequest(
            "Username missing from request".to_string(),
        ));
    };
    let Some(password) = payload.password.filter(|p| !p.is_empty()) else {
        return Err(AppError::BadRequest(
            "Password missing from request".to_string(),
        ));
    };

    let user = Users::find()
        .filter(UserCol::Username.eq(&username))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => {
            return Err(AppError::BadRequest(
                "User not found in database".to_string(),
            ));
        }
    };

    // Seeded users may carry no hash at all; they cannot log in.
    let Some(stored_hash) = user.password_hash.as_deref() else {
        return Err(AppError::NoPasswordSet);
    };

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::IncorrectPassword);
    }

    let tokens = token_service::issue_session_tokens(&state.config, &user)?;

    let record = &tokens.refresh_token;
    refresh_tokens::ActiveModel {
        id: Set(record.id),
        token: Set(record.token.clone()),
        expiry_date: Set(record.expiry_date.clone()),
        user_id: Set(record.user_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(LoginPayload {
        username: user.username,
        name: user.name,
        id: user.id,
        is_admin: user.is_admin,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.token,
    })
}
