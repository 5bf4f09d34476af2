use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "Admin", "admin123", true).await?;
    let user_id = ensure_user(&pool, "user@example.com", "Test User", "user123", false).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    name: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, name, password_hash, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(name)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {username} (admin={is_admin})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        (
            "Galaxy Z Fold7",
            "Mobiles",
            1899.99,
            serde_json::json!(["512 GB", "Foldable AMOLED"]),
            25,
            Some("Samsung"),
        ),
        (
            "Oak Bookshelf",
            "Furniture",
            349.50,
            serde_json::json!(["180x80 cm", "Solid oak"]),
            12,
            None,
        ),
        (
            "ThinkPad X1 Carbon",
            "Laptops",
            1549.00,
            serde_json::json!(["14 inch", "32 GB RAM", "1 TB SSD"]),
            8,
            Some("Lenovo"),
        ),
    ];

    for (title, category, price, specs, instock, brand) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, category, price, specs, instock, brand)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (title) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(category)
        .bind(price)
        .bind(specs)
        .bind(instock)
        .bind(brand)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
