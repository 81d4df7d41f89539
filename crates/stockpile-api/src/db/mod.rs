//! # Database Persistence Layer
//!
//! Postgres persistence for items via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is set the service
//! stores items in the `items` table; otherwise it runs on the in-memory
//! repository and state does not survive restarts.

pub mod items;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::AppConfig;

/// Connect to Postgres and run the embedded migrations.
///
/// Returns `None` when no database URL is configured (in-memory mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(config: &AppConfig) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!(
            "DATABASE_URL not set, running in-memory only mode. \
             Items will not survive restarts."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!(max_connections = config.db_max_connections, "connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(Some(pool))
}
