//! Database Connection Management
//!
//! PostgreSQL connection pooling with SQLx.

use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Database connection pool type alias for convenience
pub type DatabasePool = PgPool;

/// Create a database connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .connect(&config.url)
        .await
}
