use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::users::{AddedUserResponse, ChangePasswordRequest, NewUserRequest, SaveResultResponse, UserListResponse},
    error::AppResult,
    middleware::auth::{AuthToken, MaybeAuthToken},
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(add_user))
        .route("/{id}", put(change_password))
        .route("/{id}", delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, password hashes excluded", body = UserListResponse),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthToken(claims): AuthToken,
) -> AppResult<Json<UserListResponse>> {
    let users = user_service::list_users(&state, &claims).await?;
    Ok(Json(UserListResponse { users }))
}

/// The only route reachable without any token: self-registration of a
/// non-admin user. Creating an admin account still requires an admin token.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "User created", body = AddedUserResponse),
        (status = 400, description = "Username taken"),
        (status = 403, description = "Admin creation without admin token")
    ),
    tag = "Users"
)]
pub async fn add_user(
    State(state): State<AppState>,
    MaybeAuthToken(claims): MaybeAuthToken,
    Json(payload): Json<NewUserRequest>,
) -> AppResult<(StatusCode, Json<AddedUserResponse>)> {
    let added_user = user_service::register_user(&state, claims.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(AddedUserResponse { added_user })))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SaveResultResponse),
        (status = 403, description = "Not the token owner"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthToken(claims): AuthToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<SaveResultResponse>> {
    let save_result = user_service::change_password(&state, &claims, id, payload).await?;
    Ok(Json(SaveResultResponse { save_result }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthToken(claims): AuthToken,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    user_service::delete_user(&state, &claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
