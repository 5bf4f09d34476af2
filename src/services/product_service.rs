use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::Claims,
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::product_orders::{Column as ProductOrderCol, Entity as ProductOrders},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::require_admin,
    models::Product,
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<Vec<Product>> {
    let products = Products::find()
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(products)
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    match result {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound("Product not found".to_string())),
    }
}

pub async fn create_product(
    state: &AppState,
    claims: &Claims,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let admin = require_admin(claims, "add products")?;
    let admin_id = admin.id;

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        title: Set(payload.title),
        category: Set(payload.category),
        price: Set(payload.price),
        imgs: Set(payload.imgs.map(|imgs| serde_json::json!(imgs))),
        specs: Set(serde_json::json!(payload.specs)),
        instock: Set(payload.instock),
        eta: Set(payload.eta),
        rating: Set(payload.rating),
        popular: Set(payload.popular),
        brand: Set(payload.brand),
        ram: Set(payload.ram),
        product_type: Set(payload.product_type),
        processor: Set(payload.processor),
        displaysize: Set(payload.displaysize),
        has_ssd: Set(payload.has_ssd),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product_from_entity(product))
}

pub async fn update_product(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let admin = require_admin(claims, "update products")?;
    let admin_id = admin.id;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product not found".to_string())),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(imgs) = payload.imgs {
        active.imgs = Set(Some(serde_json::json!(imgs)));
    }
    if let Some(specs) = payload.specs {
        active.specs = Set(serde_json::json!(specs));
    }
    if let Some(instock) = payload.instock {
        if instock < 0 {
            return Err(AppError::BadRequest("instock cannot be negative".to_string()));
        }
        active.instock = Set(instock);
    }
    if let Some(eta) = payload.eta {
        active.eta = Set(Some(eta));
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(Some(rating));
    }
    if let Some(popular) = payload.popular {
        active.popular = Set(Some(popular));
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand));
    }
    if let Some(ram) = payload.ram {
        active.ram = Set(Some(ram));
    }
    if let Some(product_type) = payload.product_type {
        active.product_type = Set(Some(product_type));
    }
    if let Some(processor) = payload.processor {
        active.processor = Set(Some(processor));
    }
    if let Some(displaysize) = payload.displaysize {
        active.displaysize = Set(Some(displaysize));
    }
    if let Some(has_ssd) = payload.has_ssd {
        active.has_ssd = Set(Some(has_ssd));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product_from_entity(product))
}

/// Admin-only. A product referenced by any order cannot be deleted; the
/// junction rows (and the order history they belong to) win.
pub async fn delete_product(state: &AppState, claims: &Claims, id: Uuid) -> AppResult<()> {
    let admin = require_admin(claims, "delete products")?;
    let admin_id = admin.id;

    let in_orders = ProductOrders::find()
        .filter(ProductOrderCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if in_orders > 0 {
        return Err(AppError::BadRequest(
            "Cannot delete product that is part of an order".to_string(),
        ));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        category: model.category,
        price: model.price,
        imgs: model
            .imgs
            .and_then(|imgs| serde_json::from_value(imgs).ok()),
        specs: serde_json::from_value(model.specs).unwrap_or_default(),
        instock: model.instock,
        eta: model.eta,
        rating: model.rating,
        popular: model.popular,
        brand: model.brand,
        ram: model.ram,
        product_type: model.product_type,
        processor: model.processor,
        displaysize: model.displaysize,
        has_ssd: model.has_ssd,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
