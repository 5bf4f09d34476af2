use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::Claims,
    dto::orders::{NewOrderRequest, OrdersResponse},
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_orders::{
            ActiveModel as ProductOrderActive, Column as ProductOrderCol, Entity as ProductOrders,
        },
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::require_admin,
    models::{OrderWithProducts, OrderedProduct},
    state::AppState,
};

/// Turn a validated cart into a persisted order.
///
/// The order row, every junction row and every stock decrement commit in a
/// single transaction; any line failure rolls the whole order back. Product
/// rows are locked for the duration and the decrement re-checks stock, so
/// two concurrent orders cannot oversell the same product.
pub async fn place_order(state: &AppState, payload: NewOrderRequest) -> AppResult<OrderWithProducts> {
    for line in &payload.products {
        if line.quantity < 1 {
            return Err(AppError::BadRequest(format!(
                "You're trying to order product {} with quantity '0', order failed",
                line.id
            )));
        }
    }

    let mut product_ids: Vec<Uuid> = payload.products.iter().map(|line| line.id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let txn = state.orm.begin().await?;

    let products_in_db = Products::find()
        .filter(ProdCol::Id.is_in(product_ids.clone()))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if products_in_db.len() != product_ids.len() || products_in_db.is_empty() {
        return Err(AppError::BadRequest(
            "One or more products not found in database, order failed.".to_string(),
        ));
    }

    for product in &products_in_db {
        if product.instock < 1 {
            return Err(AppError::BadRequest(format!(
                "Product {} not in stock, order failed",
                product.id
            )));
        }
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email.clone()),
        name: Set(payload.name.clone()),
        address: Set(payload.address.clone()),
        zipcode: Set(payload.zipcode.clone()),
        city: Set(payload.city.clone()),
        country: Set(payload.country.clone()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_lines: Vec<OrderedProduct> = Vec::new();

    for product in &products_in_db {
        let Some(requested) = payload.products.iter().find(|line| line.id == product.id) else {
            return Err(AppError::Invariant(format!(
                "Product {}: No match found between product in database and product in new order",
                product.id
            )));
        };

        if requested.quantity > product.instock {
            return Err(AppError::BadRequest(format!(
                "Product {}: Not enough product in stock, order failed",
                product.id
            )));
        }

        ProductOrderActive {
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(requested.quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        // Conditional decrement; the row lock plus the instock guard make
        // this safe against concurrent orders for the same product.
        let updated = Products::update_many()
            .col_expr(
                ProdCol::Instock,
                Expr::col(ProdCol::Instock).sub(requested.quantity),
            )
            .filter(ProdCol::Id.eq(product.id))
            .filter(ProdCol::Instock.gte(requested.quantity))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            return Err(AppError::BadRequest(format!(
                "Product {}: Not enough product in stock, order failed",
                product.id
            )));
        }

        order_lines.push(OrderedProduct {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            instock: product.instock - requested.quantity,
            quantity: requested.quantity,
        });
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(order_with_products(order, order_lines))
}

/// All orders with their product lines, junction quantity denormalized
/// into each embedded product. Admin only.
pub async fn list_orders(state: &AppState, claims: &Claims) -> AppResult<OrdersResponse> {
    require_admin(claims, "list orders")?;

    let orders = Orders::find()
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let rows = ProductOrders::find()
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut lines_by_order: HashMap<Uuid, Vec<OrderedProduct>> = HashMap::new();
    for (junction, product) in rows {
        let Some(product) = product else {
            return Err(AppError::Invariant(format!(
                "Order line for product {} has no product row",
                junction.product_id
            )));
        };
        lines_by_order
            .entry(junction.order_id)
            .or_default()
            .push(OrderedProduct {
                id: product.id,
                title: product.title,
                price: product.price,
                instock: product.instock,
                quantity: junction.quantity,
            });
    }

    let orders = orders
        .into_iter()
        .map(|order| {
            let lines = lines_by_order.remove(&order.id).unwrap_or_default();
            order_with_products(order, lines)
        })
        .collect();

    Ok(OrdersResponse { orders })
}

/// Admin-only deletion. Junction rows go first, then the order row, in one
/// transaction. Stock consumed by the order is NOT restored.
pub async fn delete_order(state: &AppState, claims: &Claims, id: Uuid) -> AppResult<()> {
    let admin = require_admin(claims, "delete orders")?;
    let admin_id = admin.id;

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".to_string())),
    };

    let txn = state.orm.begin().await?;

    ProductOrders::delete_many()
        .filter(ProductOrderCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;

    Orders::delete_by_id(order.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

fn order_with_products(model: OrderModel, products: Vec<OrderedProduct>) -> OrderWithProducts {
    OrderWithProducts {
        id: model.id,
        email: model.email,
        name: model.name,
        address: model.address,
        zipcode: model.zipcode,
        city: model.city,
        country: model.country,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        products,
    }
}
