use argon2::{
    Argon2, PasswordHasher,
    password_hash::SaltString,
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::Claims,
    dto::users::{ChangePasswordRequest, NewUserRequest},
    entity::users::{
        ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel,
    },
    error::{AppError, AppResult},
    middleware::auth::require_admin,
    models::User,
    state::AppState,
};

/// Create a user. Non-admin self-registration is public; creating an admin
/// user requires an admin token.
pub async fn register_user(
    state: &AppState,
    claims: Option<&Claims>,
    payload: NewUserRequest,
) -> AppResult<User> {
    if payload.isadmin {
        let claims = claims.ok_or(AppError::MissingToken)?;
        require_admin(claims, "create admin users")?;
    }

    let exist = Users::find()
        .filter(UserCol::Username.eq(&payload.username))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(payload.username),
        name: Set(payload.name),
        password_hash: Set(Some(password_hash)),
        is_admin: Set(payload.isadmin),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "isadmin": user.is_admin })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(user_from_entity(user))
}

pub async fn list_users(state: &AppState, claims: &Claims) -> AppResult<Vec<User>> {
    require_admin(claims, "get users")?;

    let users = Users::find()
        .order_by_asc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    Ok(users)
}

/// Users may only change their own password; guest tokens carry no
/// identity and always fail the ownership check.
pub async fn change_password(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    payload: ChangePasswordRequest,
) -> AppResult<User> {
    let user = Users::find_by_id(id).one(&state.orm).await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound("User not found".to_string())),
    };

    let is_self = claims.as_user().is_some_and(|u| u.id == user.id);
    if !is_self {
        return Err(AppError::Forbidden(
            "Users can only change their own password".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;

    let mut active: UserActive = user.into();
    active.password_hash = Set(Some(password_hash));
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_password_change",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(user_from_entity(user))
}

/// Admin-only. Refresh tokens owned by the user go with it (FK cascade).
pub async fn delete_user(state: &AppState, claims: &Claims, id: Uuid) -> AppResult<()> {
    let admin = require_admin(claims, "delete users")?;
    let admin_id = admin.id;

    let user = Users::find_by_id(id).one(&state.orm).await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound("User not found".to_string())),
    };

    Users::delete_by_id(user.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin_id),
        "user_delete",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        name: model.name,
        is_admin: model.is_admin,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
