use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::OnceLock;

pub mod models;
pub mod repositories;
pub mod slug;
pub mod transaction;
pub mod utils;

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Connect to Postgres, run pending migrations, and install the process-wide
/// pool. Must complete before anything calls `get_pool`.
pub async fn init_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed");

    if POOL.set(pool.clone()).is_err() {
        log::warn!("Database pool was already initialized");
    }

    Ok(pool)
}

/// The process-wide connection pool. Panics when called before
/// `init_database`; that is a startup-order bug, not a runtime condition.
pub fn get_pool() -> &'static PgPool {
    POOL.get().expect("init_database must run before get_pool")
}
