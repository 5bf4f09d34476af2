use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::auth::{Claims, LoginRequest, UserClaims},
    dto::checkout::CartLine,
    dto::orders::NewOrderRequest,
    dto::users::NewUserRequest,
    entity::{
        product_orders::{Column as ProductOrderCol, Entity as ProductOrders},
        products::{ActiveModel as ProductActive, Entity as Products},
        refresh_tokens::{ActiveModel as RefreshTokenActive, Column as RefreshTokenCol, Entity as RefreshTokens},
        users::ActiveModel as UserActive,
    },
    error::AppError,
    models::ProductCategory,
    services::{auth_service, order_service, token_service, user_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: registration and login, refresh-token lifecycle, guest
// ordering against real stock, rollback on insufficient stock, and the
// admin-only order listing/deletion. Runs against a real database.
#[tokio::test]
async fn storefront_order_and_auth_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // --- registration and login ---

    let registered = user_service::register_user(
        &state,
        None,
        NewUserRequest {
            username: "customer@example.com".to_string(),
            name: "Customer".to_string(),
            password: "hunter2!".to_string(),
            isadmin: false,
        },
    )
    .await?;
    assert!(!registered.is_admin);

    // Duplicate usernames are rejected before hashing anything.
    let err = user_service::register_user(
        &state,
        None,
        NewUserRequest {
            username: "customer@example.com".to_string(),
            name: "Copycat".to_string(),
            password: "hunter2!".to_string(),
            isadmin: false,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Username is already taken");

    // Creating an admin user without a token is refused.
    let err = user_service::register_user(
        &state,
        None,
        NewUserRequest {
            username: "sneaky@example.com".to_string(),
            name: "Sneaky".to_string(),
            password: "hunter2!".to_string(),
            isadmin: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::MissingToken));

    let payload = auth_service::login_user(
        &state,
        LoginRequest {
            username: Some("customer@example.com".to_string()),
            password: Some("hunter2!".to_string()),
        },
    )
    .await?;
    assert_eq!(payload.username, "customer@example.com");
    assert!(!payload.is_admin);

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            username: Some("customer@example.com".to_string()),
            password: Some("wrong password".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Incorrect password");

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            username: Some("nobody@example.com".to_string()),
            password: Some("hunter2!".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "User not found in database");

    // Seeded user without a password hash cannot log in at all.
    let seeded = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set("seeded@example.com".to_string()),
        name: Set("Seeded".to_string()),
        password_hash: Set(None),
        is_admin: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let err = auth_service::login_user(
        &state,
        LoginRequest {
            username: Some(seeded.username.clone()),
            password: Some("anything".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "User has no password set");

    // --- refresh-token lifecycle ---

    let access_token = token_service::refresh_access_token(&state, &payload.refresh_token).await?;
    assert!(!access_token.is_empty());

    // Refreshing does not rotate the token; it stays usable.
    token_service::refresh_access_token(&state, &payload.refresh_token).await?;

    let err = token_service::refresh_access_token(&state, "no-such-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Refresh token not found in database");

    // An expired record is deleted the moment it is presented.
    let expired = RefreshTokenActive {
        id: Set(Uuid::new_v4()),
        token: Set("expired-token".to_string()),
        expiry_date: Set("0".to_string()),
        user_id: Set(payload.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let err = token_service::refresh_access_token(&state, "expired-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Refresh token has expired, login again");
    let gone = RefreshTokens::find()
        .filter(RefreshTokenCol::Id.eq(expired.id))
        .one(&state.orm)
        .await?;
    assert!(gone.is_none(), "expired refresh token should be deleted");

    // --- order placement ---

    let phone = seed_product(&state, "Test Phone", ProductCategory::Mobiles, 10).await?;
    let couch = seed_product(&state, "Test Couch", ProductCategory::Furniture, 5).await?;

    let order = order_service::place_order(&state, order_request(vec![
        CartLine { id: phone, quantity: 2 },
        CartLine { id: couch, quantity: 1 },
    ]))
    .await?;
    assert_eq!(order.products.len(), 2);

    let stock = instock(&state, phone).await?;
    assert_eq!(stock, 8, "stock decrements by exactly the committed quantity");
    assert_eq!(instock(&state, couch).await?, 4);

    // Reading the order back twice yields identical quantities.
    let admin = admin_claims();
    let first = order_service::list_orders(&state, &admin).await?;
    let second = order_service::list_orders(&state, &admin).await?;
    let quantities = |resp: &storefront_api::dto::orders::OrdersResponse| -> Vec<(Uuid, i32)> {
        resp.orders
            .iter()
            .flat_map(|o| o.products.iter().map(|p| (p.id, p.quantity)))
            .collect()
    };
    assert_eq!(quantities(&first), quantities(&second));
    assert_eq!(first.orders.len(), 1);

    // Zero quantity fails before anything is touched.
    let err = order_service::place_order(
        &state,
        order_request(vec![CartLine { id: phone, quantity: 0 }]),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("You're trying to order product {phone} with quantity '0', order failed")
    );

    // Unknown product fails as one aggregate error with no order row.
    let orders_before = order_count(&state).await?;
    let err = order_service::place_order(
        &state,
        order_request(vec![CartLine {
            id: Uuid::new_v4(),
            quantity: 1,
        }]),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "One or more products not found in database, order failed."
    );
    assert_eq!(order_count(&state).await?, orders_before);

    // Insufficient stock: nothing commits, stock untouched.
    let scarce = seed_product(&state, "Scarce Laptop", ProductCategory::Laptops, 3).await?;
    let err = order_service::place_order(
        &state,
        order_request(vec![CartLine { id: scarce, quantity: 5 }]),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Product {scarce}: Not enough product in stock, order failed")
    );
    assert_eq!(instock(&state, scarce).await?, 3);
    assert_eq!(order_count(&state).await?, orders_before);
    let scarce_lines = ProductOrders::find()
        .filter(ProductOrderCol::ProductId.eq(scarce))
        .all(&state.orm)
        .await?;
    assert!(scarce_lines.is_empty(), "rolled-back order must leave no lines");

    // A product with zero stock is caught by the pre-check.
    let empty = seed_product(&state, "Sold Out Shelf", ProductCategory::Furniture, 0).await?;
    let err = order_service::place_order(
        &state,
        order_request(vec![CartLine { id: empty, quantity: 1 }]),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Product {empty} not in stock, order failed")
    );

    // --- admin gates and deletion ---

    let customer = customer_claims(payload.id);
    let err = order_service::list_orders(&state, &customer).await.unwrap_err();
    assert_eq!(err.to_string(), "Only admin users can list orders");

    let err = order_service::delete_order(&state, &admin, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Order not found");

    let order_id = first.orders[0].id;
    order_service::delete_order(&state, &admin, order_id).await?;
    assert_eq!(order_count(&state).await?, orders_before - 1);
    // Deleting an order is not a return: stock stays where the order left it.
    assert_eq!(instock(&state, phone).await?, 8);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE product_orders, orders, refresh_tokens, audit_logs, products, users CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        access_token_secret: "accesssecret".to_string(),
        refresh_token_secret: "refreshsecret".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 86400,
    };

    Ok(AppState { pool, orm, config })
}

async fn seed_product(
    state: &AppState,
    title: &str,
    category: ProductCategory,
    instock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        category: Set(category),
        price: Set(99.99),
        imgs: Set(None),
        specs: Set(serde_json::json!(["test spec"])),
        instock: Set(instock),
        eta: Set(None),
        rating: Set(None),
        popular: Set(None),
        brand: Set(None),
        ram: Set(None),
        product_type: Set(None),
        processor: Set(None),
        displaysize: Set(None),
        has_ssd: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}

fn order_request(products: Vec<CartLine>) -> NewOrderRequest {
    NewOrderRequest {
        products,
        email: "customer@example.com".to_string(),
        name: "Customer".to_string(),
        address: "1 Test Street".to_string(),
        zipcode: "00100".to_string(),
        city: "Helsinki".to_string(),
        country: "Finland".to_string(),
    }
}

fn admin_claims() -> Claims {
    Claims::User(UserClaims {
        id: Uuid::new_v4(),
        username: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        is_admin: true,
        exp: Utc::now().timestamp() + 3600,
    })
}

fn customer_claims(id: Uuid) -> Claims {
    Claims::User(UserClaims {
        id,
        username: "customer@example.com".to_string(),
        name: "Customer".to_string(),
        is_admin: false,
        exp: Utc::now().timestamp() + 3600,
    })
}

async fn instock(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .expect("product exists");
    Ok(product.instock)
}

async fn order_count(state: &AppState) -> anyhow::Result<usize> {
    use storefront_api::entity::Orders;
    Ok(Orders::find().all(&state.orm).await?.len())
}
