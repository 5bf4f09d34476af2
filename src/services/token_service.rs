use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::{
        auth::{GuestClaims, RefreshClaims, UserClaims},
        checkout::CartItems,
    },
    entity::{refresh_tokens, users},
    error::{AppError, AppResult},
    models::RefreshToken,
    state::AppState,
};

/// Guest-checkout tokens authorize a single order placement and nothing
/// else, so they get a fixed short lifetime.
const GUEST_TOKEN_TTL_SECS: i64 = 900;

#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    /// To be persisted by the caller; the token string inside goes to the
    /// client verbatim.
    pub refresh_token: RefreshToken,
}

/// Mint the access/refresh token pair for a freshly authenticated user.
/// Pure function of config, user data and the clock; persisting the
/// refresh-token record is the caller's job.
pub fn issue_session_tokens(config: &AppConfig, user: &users::Model) -> AppResult<SessionTokens> {
    let access_token = sign_access_token(config, user)?;

    // No exp claim in the refresh token: the expiry_date stored with the
    // record is the only value ever consulted.
    let refresh_claims = RefreshClaims {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        is_admin: user.is_admin,
    };
    let token = encode(
        &Header::default(),
        &refresh_claims,
        &EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let expiry_date =
        (Utc::now().timestamp_millis() + config.refresh_token_ttl_secs * 1000).to_string();

    Ok(SessionTokens {
        access_token,
        refresh_token: RefreshToken {
            id: Uuid::new_v4(),
            token,
            expiry_date,
            user_id: user.id,
        },
    })
}

/// Mint a temporary access token embedding the cart contents, so a guest
/// can place one order without an account.
pub fn issue_guest_token(config: &AppConfig, cart: &CartItems) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(GUEST_TOKEN_TTL_SECS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = GuestClaims {
        products: cart.products.clone(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Exchange a stored refresh token for a fresh access token. The new token
/// is minted from current user data, not from the refresh token's stale
/// claims. An expired token is deleted on sight; a valid one stays usable
/// until its own expiry.
pub async fn refresh_access_token(state: &AppState, refresh_token: &str) -> AppResult<String> {
    let token_in_db = refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::Token.eq(refresh_token))
        .one(&state.orm)
        .await?;

    let Some(token_in_db) = token_in_db else {
        return Err(AppError::BadRequest(
            "Refresh token not found in database".to_string(),
        ));
    };

    let expiry_ms: i64 = token_in_db.expiry_date.parse().map_err(|_| {
        AppError::Invariant(format!(
            "Refresh token {} has a malformed expiry timestamp",
            token_in_db.id
        ))
    })?;

    if expiry_ms < Utc::now().timestamp_millis() {
        token_in_db.delete(&state.orm).await?;
        return Err(AppError::RefreshTokenExpired);
    }

    let user = users::Entity::find_by_id(token_in_db.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| {
            AppError::Invariant(format!(
                "Refresh token {} references a missing user",
                token_in_db.id
            ))
        })?;

    sign_access_token(&state.config, &user)
}

pub fn sign_access_token(config: &AppConfig, user: &users::Model) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(config.access_token_ttl_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = UserClaims {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        is_admin: user.is_admin,
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
