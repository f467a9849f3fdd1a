//! Lock manager that dispatches to the configured coordinator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use boxoffice_core::config::{LockConfig, LockProvider};
use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;

/// Lock manager wrapping the configured coordinator.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct LockManager {
    inner: Arc<dyn LockCoordinator>,
}

impl LockManager {
    /// Create a lock manager from configuration.
    pub async fn new(config: &LockConfig) -> AppResult<Self> {
        let inner: Arc<dyn LockCoordinator> = match config.provider {
            #[cfg(feature = "redis-backend")]
            LockProvider::Redis => {
                info!("Initializing Redis lock coordinator");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisLockCoordinator::new(client))
            }
            #[cfg(feature = "memory")]
            LockProvider::Memory => {
                info!("Initializing in-memory lock coordinator");
                Arc::new(crate::memory::MemoryLockCoordinator::new())
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Lock provider {other:?} is not compiled into this build"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a lock manager from an existing coordinator (for testing).
    pub fn from_coordinator(coordinator: Arc<dyn LockCoordinator>) -> Self {
        Self { inner: coordinator }
    }
}

#[async_trait]
impl LockCoordinator for LockManager {
    async fn try_acquire(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.try_acquire(key, owner, ttl).await
    }

    async fn current_owner(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.current_owner(key).await
    }

    async fn remaining_ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.inner.remaining_ttl(key).await
    }

    async fn release(&self, key: &str) -> AppResult<()> {
        self.inner.release(key).await
    }

    async fn release_if_owner(&self, key: &str, owner: &str) -> AppResult<bool> {
        self.inner.release_if_owner(key, owner).await
    }

    async fn extend_if_owner(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.extend_if_owner(key, owner, ttl).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
