use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    config::AppConfig,
    dto::auth::{Claims, UserClaims},
    error::AppError,
    state::AppState,
};

/// Verified bearer credential: either a logged-in user's identity or the
/// cart carried by a guest-checkout token.
#[derive(Debug, Clone)]
pub struct AuthToken(pub Claims);

/// Like [`AuthToken`] but tolerates a missing Authorization header, for the
/// one public route (non-admin self-registration) that may proceed without
/// a token. A header that is present but fails verification still rejects.
#[derive(Debug, Clone)]
pub struct MaybeAuthToken(pub Option<Claims>);

/// Capability check shared by every admin-gated operation. Guest tokens
/// carry no identity and never pass.
pub fn require_admin<'a>(claims: &'a Claims, action: &str) -> Result<&'a UserClaims, AppError> {
    match claims.as_user() {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(AppError::Forbidden(format!("Only admin users can {action}"))),
    }
}

pub fn decode_access_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.access_token_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

// Scheme match is case-insensitive. Returns None when the header is absent
// or not Bearer-shaped.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    if value.len() < 7 || !value[..7].eq_ignore_ascii_case("bearer ") {
        return None;
    }
    Some(value[7..].trim())
}

impl<S> FromRequestParts<S> for AuthToken
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts).ok_or(AppError::MissingToken)?;
        let claims = decode_access_token(&state.config, token)?;
        Ok(AuthToken(claims))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthToken
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match bearer_token(parts) {
            Some(token) => {
                let claims = decode_access_token(&state.config, token)?;
                Ok(MaybeAuthToken(Some(claims)))
            }
            None => Ok(MaybeAuthToken(None)),
        }
    }
}
