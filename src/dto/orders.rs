use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::checkout::CartLine, models::OrderWithProducts};

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewOrderRequest {
    pub products: Vec<CartLine>,
    pub email: String,
    pub name: String,
    pub address: String,
    pub zipcode: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedOrderResponse {
    #[serde(rename = "orderInDb")]
    pub order_in_db: OrderWithProducts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrdersResponse {
    pub orders: Vec<OrderWithProducts>,
}
