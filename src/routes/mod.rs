use axum::Router;

use crate::state::AppState;

pub mod authorization;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/authorization", authorization::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
}
