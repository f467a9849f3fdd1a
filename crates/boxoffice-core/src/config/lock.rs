//! Lock coordinator configuration.

use serde::{Deserialize, Serialize};

/// Which lock coordinator backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockProvider {
    /// Process-local locks. Only safe for a single server instance.
    #[default]
    Memory,
    /// Redis `SET NX EX` locks shared by every instance.
    Redis,
}

/// Top-level lock coordinator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock backend.
    #[serde(default)]
    pub provider: LockProvider,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisLockConfig,
}

/// Redis lock backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLockConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix prepended to every lock key.
    #[serde(default)]
    pub key_prefix: String,
}

impl Default for RedisLockConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: String::new(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
