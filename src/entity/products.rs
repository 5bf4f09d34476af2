use sea_orm::entity::prelude::*;

use crate::models::ProductCategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    pub category: ProductCategory,
    pub price: f64,
    pub imgs: Option<Json>,
    pub specs: Json,
    pub instock: i32,
    pub eta: Option<i32>,
    pub rating: Option<i32>,
    pub popular: Option<bool>,
    pub brand: Option<String>,
    pub ram: Option<String>,
    pub product_type: Option<String>,
    pub processor: Option<String>,
    pub displaysize: Option<String>,
    pub has_ssd: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_orders::Entity")]
    ProductOrders,
}

impl Related<super::product_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductOrders.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_orders::Relation::Orders.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_orders::Relation::Products.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
