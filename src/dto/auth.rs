use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::checkout::CartLine;

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginPayload {
    pub username: String,
    pub name: String,
    pub id: Uuid,
    #[serde(rename = "isadmin")]
    pub is_admin: bool,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub payload: LoginPayload,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Claims signed into an access token for a logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(rename = "isadmin")]
    pub is_admin: bool,
    pub exp: i64,
}

/// Claims signed into a temporary guest-checkout token: the cart contents
/// and nothing about identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestClaims {
    pub products: Vec<CartLine>,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Claims {
    User(UserClaims),
    Guest(GuestClaims),
}

impl Claims {
    pub fn as_user(&self) -> Option<&UserClaims> {
        match self {
            Claims::User(user) => Some(user),
            Claims::Guest(_) => None,
        }
    }
}

/// Claims signed into a refresh token. Deliberately carries no `exp`: the
/// expiry stored next to the token row is the single source of truth.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(rename = "isadmin")]
    pub is_admin: bool,
}
