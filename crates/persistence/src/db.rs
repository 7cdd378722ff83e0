//! Database connection pool management and error mapping.

use async_trait::async_trait;
use domain::services::{StoreError, StoreHealth};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::metrics::record_pool_metrics;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Creates a PostgreSQL connection pool with the given configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Maps a driver error onto the store-neutral error type.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::Conflict(db.message().to_string()),
            Some(FOREIGN_KEY_VIOLATION) | Some(CHECK_VIOLATION) => {
                StoreError::Constraint(db.message().to_string())
            }
            _ => {
                tracing::error!(error = %err, "Database error");
                StoreError::Unavailable(err.to_string())
            }
        },
        _ => {
            tracing::error!(error = %err, "Database error");
            StoreError::Unavailable(err.to_string())
        }
    }
}

/// Readiness check against the pool.
#[derive(Clone)]
pub struct PgHealth {
    pool: PgPool,
}

impl PgHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
