use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::checkout::{CartItems, CheckoutResponse},
    error::AppResult,
    services::token_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(checkout))
}

/// Guest checkout: exchange a cart for a short-lived access token that
/// authorizes one order placement without logging in.
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CartItems,
    responses(
        (status = 200, description = "Temporary access token", body = CheckoutResponse)
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(cart): Json<CartItems>,
) -> AppResult<Json<CheckoutResponse>> {
    let access_token = token_service::issue_guest_token(&state.config, &cart)?;
    Ok(Json(CheckoutResponse { access_token }))
}
