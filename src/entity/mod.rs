pub mod orders;
pub mod product_orders;
pub mod products;
pub mod refresh_tokens;
pub mod users;

pub use orders::Entity as Orders;
pub use product_orders::Entity as ProductOrders;
pub use products::Entity as Products;
pub use refresh_tokens::Entity as RefreshTokens;
pub use users::Entity as Users;
