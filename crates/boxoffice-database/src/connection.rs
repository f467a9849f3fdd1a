//! Postgres pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use boxoffice_core::config::DatabaseConfig;
use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::types::redact::redact_password;

/// Shared handle to the seat database.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool and wait for the first connection.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %redact_password(&config.url),
            max = config.max_connections,
            min = config.min_connections,
            "Opening seat database pool"
        );

        let options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        let pool = options.connect(&config.url).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Seat database unreachable", e)
        })?;

        info!("Seat database pool ready");
        Ok(Self { pool })
    }

    /// The sqlx pool, for stores and migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Seat database pool closed");
    }
}
