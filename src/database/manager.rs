use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Stored {column} is not valid JSON: {source}")]
    InvalidStoredJson {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {column}: {source}")]
    Serialization {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Stable machine-readable code for the failure class
    pub fn code(&self) -> &'static str {
        match self {
            DatabaseError::QueryError(_) => "QUERY_ERROR",
            DatabaseError::InvalidStoredJson { .. } => "INVALID_STORED_JSON",
            DatabaseError::Serialization { .. } => "SERIALIZATION_ERROR",
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => "POOL_TIMED_OUT",
            DatabaseError::Sqlx(sqlx::Error::Io(_)) => "CONNECTION_ERROR",
            DatabaseError::Sqlx(sqlx::Error::Database(_)) => "DATABASE_ERROR",
            DatabaseError::Sqlx(_) => "SQLX_ERROR",
        }
    }
}

/// Owns the process-wide connection pool
pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    /// Open the pool and verify one connection can be established
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = Self::pool_options(config)
            .connect_with(Self::connect_options(config))
            .await?;

        info!(
            "Created database pool for {}@{}:{}/{} (max {} connections)",
            config.username, config.host, config.port, config.database, config.max_connections
        );
        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
        // Exhaustion queues callers until acquire_timeout rather than failing fast
        MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .database(&config.database);

        if config.password.is_empty() {
            options
        } else {
            options.password(&config.password)
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
