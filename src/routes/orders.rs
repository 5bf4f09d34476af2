use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreatedOrderResponse, NewOrderRequest, OrdersResponse},
    error::AppResult,
    middleware::auth::AuthToken,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(place_order))
        .route("/{id}", delete(delete_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders with their products", body = OrdersResponse),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthToken(claims): AuthToken,
) -> AppResult<Json<OrdersResponse>> {
    let resp = order_service::list_orders(&state, &claims).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = NewOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreatedOrderResponse),
        (status = 400, description = "Invalid quantity, unknown product or insufficient stock")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    AuthToken(_claims): AuthToken,
    Json(payload): Json<NewOrderRequest>,
) -> AppResult<(StatusCode, Json<CreatedOrderResponse>)> {
    let order_in_db = order_service::place_order(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedOrderResponse { order_in_db }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    AuthToken(claims): AuthToken,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    order_service::delete_order(&state, &claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
