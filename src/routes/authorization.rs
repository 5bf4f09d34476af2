use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{AccessTokenResponse, LoginRequest, LoginResponse, RefreshRequest},
    error::{AppError, AppResult},
    services::{auth_service, token_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

#[utoipa::path(
    post,
    path = "/api/authorization/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = LoginResponse),
        (status = 400, description = "Missing credentials or unknown user"),
        (status = 401, description = "Incorrect password"),
        (status = 500, description = "User has no password set")
    ),
    tag = "Authorization"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let payload = auth_service::login_user(&state, payload).await?;
    Ok(Json(LoginResponse { payload }))
}

#[utoipa::path(
    post,
    path = "/api/authorization/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 201, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Refresh token missing or not found"),
        (status = 401, description = "Refresh token expired")
    ),
    tag = "Authorization"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<(StatusCode, Json<AccessTokenResponse>)> {
    let Some(refresh_token) = payload.refresh_token.filter(|t| !t.is_empty()) else {
        return Err(AppError::BadRequest(
            "Refresh token missing from request".to_string(),
        ));
    };

    let access_token = token_service::refresh_access_token(&state, &refresh_token).await?;
    Ok((StatusCode::CREATED, Json(AccessTokenResponse { access_token })))
}
