use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use market_api::models::User;

/// Connect to DATABASE_URL and make sure the marketplace tables exist.
/// Returns None when no database is reachable so DB-backed tests can skip
/// on machines without Postgres instead of failing.
pub async fn try_pool() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect(&url)
        .await
        .ok()?;

    ensure_schema(&pool).await.ok()?;
    Some(pool)
}

async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let ddl = [
        "CREATE TABLE IF NOT EXISTS users (
             id SERIAL PRIMARY KEY,
             username TEXT NOT NULL,
             email TEXT NOT NULL,
             password TEXT NOT NULL,
             status TEXT NOT NULL DEFAULT 'active',
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
             updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
        "CREATE TABLE IF NOT EXISTS categories (
             id SERIAL PRIMARY KEY,
             name TEXT NOT NULL,
             status TEXT NOT NULL DEFAULT 'active',
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
             updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
        "CREATE TABLE IF NOT EXISTS products (
             id SERIAL PRIMARY KEY,
             title TEXT NOT NULL,
             description TEXT NOT NULL,
             price NUMERIC NOT NULL,
             quantity INT NOT NULL,
             category_id INT NOT NULL,
             user_id INT NOT NULL,
             status TEXT NOT NULL DEFAULT 'active',
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
             updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
        "CREATE TABLE IF NOT EXISTS product_images (
             id SERIAL PRIMARY KEY,
             product_id INT NOT NULL,
             img_url TEXT NOT NULL,
             created_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
    ];

    for statement in ddl {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Per-run email so reruns do not trip over rows from an earlier process.
pub fn unique_email(tag: &str) -> String {
    format!("{}-{}@market.test", tag, std::process::id())
}

/// Insert an active user with a bcrypt-hashed password, replacing any row a
/// previous run with the same pid left behind.
pub async fn seed_user(pool: &PgPool, tag: &str, password: &str) -> Result<User> {
    let email = unique_email(tag);
    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(pool)
        .await?;

    // Minimum cost: these hashes only exist for the duration of the test run
    let hash = bcrypt::hash(password, 4)?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password, status) \
         VALUES ($1, $2, $3, 'active') RETURNING *",
    )
    .bind(tag)
    .bind(&email)
    .bind(&hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn seed_category(pool: &PgPool, name: &str) -> Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO categories (name, status) VALUES ($1, 'active') RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn seed_product(
    pool: &PgPool,
    owner_id: i32,
    category_id: i32,
    title: &str,
) -> Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO products (title, description, price, quantity, category_id, user_id, status) \
         VALUES ($1, 'seeded for tests', 10.00, 1, $2, $3, 'active') RETURNING id",
    )
    .bind(title)
    .bind(category_id)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
