use chrono::{DateTime, Utc};
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ProductCategory {
    #[sea_orm(string_value = "Mobiles")]
    Mobiles,
    #[sea_orm(string_value = "Furniture")]
    Furniture,
    #[sea_orm(string_value = "Laptops")]
    Laptops,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(rename = "isadmin")]
    pub is_admin: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub category: ProductCategory,
    pub price: f64,
    pub imgs: Option<Vec<String>>,
    pub specs: Vec<String>,
    pub instock: i32,
    pub eta: Option<i32>,
    pub rating: Option<i32>,
    pub popular: Option<bool>,
    pub brand: Option<String>,
    pub ram: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub processor: Option<String>,
    pub displaysize: Option<String>,
    pub has_ssd: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A product embedded in an order, with the junction-table quantity
/// denormalized onto it.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderedProduct {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub instock: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithProducts {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub address: String,
    pub zipcode: String,
    pub city: String,
    pub country: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "Products")]
    pub products: Vec<OrderedProduct>,
}

/// Refresh-token record minted by the token service and persisted at login.
/// `expiry_date` is epoch milliseconds kept as a string; it is the only
/// authority on whether the token is still valid.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token: String,
    pub expiry_date: String,
    pub user_id: Uuid,
}
