#![allow(dead_code)]

use axum_orders_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::AddToCartRequest,
    middleware::auth::AuthUser,
    services::cart_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

pub const JWT_SECRET: &str = "test-secret";

/// Database for the flow tests, or `None` when the environment has none.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, audit_logs, products, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let pool = create_pool(database_url).await?;
    Ok(AppState {
        pool,
        orm,
        jwt_secret: JWT_SECRET.into(),
    })
}

pub async fn create_user(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let (user_id,): (i32,) = sqlx::query_as("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(&state.pool)
        .await?;
    Ok(AuthUser { user_id })
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: f64,
    tax_percent: Option<f64>,
) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO products (name, price, tax_percent, available_stock) VALUES ($1, $2, $3, 50) RETURNING id",
    )
    .bind(name)
    .bind(price)
    .bind(tax_percent)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}

pub async fn fill_cart(
    state: &AppState,
    user: &AuthUser,
    lines: &[(i32, i32)],
) -> anyhow::Result<()> {
    for &(product_id, quantity) in lines {
        cart_service::add_to_cart(
            &state.pool,
            user,
            AddToCartRequest {
                product_id,
                quantity,
            },
        )
        .await?;
    }
    Ok(())
}

pub async fn count_orders(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}
