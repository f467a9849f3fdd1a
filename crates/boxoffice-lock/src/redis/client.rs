//! Shared Redis connection for the lock coordinator.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use boxoffice_core::config::RedisLockConfig;
use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::result::AppResult;
use boxoffice_core::types::redact::redact_password;

/// Reconnecting, multiplexed Redis connection plus the key namespace.
#[derive(Debug, Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisClient {
    /// Open the connection described by the lock configuration.
    pub async fn connect(config: &RedisLockConfig) -> AppResult<Self> {
        info!(url = %redact_password(&config.url), "Opening Redis lock connection");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Lock, "Invalid Redis lock URL", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Lock, "Redis lock server unreachable", e)
        })?;

        info!("Redis lock connection ready");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// A handle for issuing commands. Clones share the underlying socket.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Namespace a lock key.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }
}
