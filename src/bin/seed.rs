use axum_orders_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    middleware::auth::issue_token,
};
use chrono::{Duration, Utc};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    tax_percent: Option<f64>,
    stock: i32,
    original_price: Option<f64>,
    image_url: &'static str,
    category: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Basmati Rice 5kg",
        description: "Long grain aged rice",
        price: 12.5,
        tax_percent: Some(5.0),
        stock: 40,
        original_price: Some(14.0),
        image_url: "/images/rice.jpg",
        category: "Groceries",
    },
    SeedProduct {
        name: "Olive Oil 1L",
        description: "Cold pressed extra virgin",
        price: 9.99,
        tax_percent: Some(12.0),
        stock: 25,
        original_price: None,
        image_url: "/images/olive-oil.jpg",
        category: "Groceries",
    },
    SeedProduct {
        name: "Steel Water Bottle",
        description: "Keeps drinks cold for 24 hours",
        price: 18.0,
        tax_percent: None,
        stock: 60,
        original_price: Some(22.0),
        image_url: "/images/bottle.jpg",
        category: "Home",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&config.database_url).await?;

    let user_id = ensure_user(&pool, "shopper@example.com", "Demo Shopper").await?;
    seed_products(&pool).await?;
    seed_cart(&pool, user_id).await?;

    println!("Seed completed. User ID: {user_id}");

    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let token = issue_token(user_id, exp, &config.jwt_secret)?;
    println!("Dev token (24h): Bearer {token}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, name: &str) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, name, role)
        VALUES ($1, $2, 'user')
        ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email}");
    Ok(id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for product in PRODUCTS {
        let (category_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO categories (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(product.category)
        .fetch_one(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO products
                (name, description, price, tax_percent, available_stock,
                 original_price, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.tax_percent)
        .bind(product.stock)
        .bind(product.original_price)
        .bind(product.image_url)
        .bind(category_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_cart(pool: &sqlx::PgPool, user_id: i32) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity)
        SELECT $1, p.id, 2 FROM products p ORDER BY p.id LIMIT 2
        ON CONFLICT (user_id, product_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    println!("Seeded cart");
    Ok(())
}
