use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, ProductCategory};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
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
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub category: Option<ProductCategory>,
    pub price: Option<f64>,
    pub imgs: Option<Vec<String>>,
    pub specs: Option<Vec<String>>,
    pub instock: Option<i32>,
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
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}
