//! Event metadata cache configuration.

use serde::{Deserialize, Serialize};

/// In-process cache for event rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached events in seconds.
    #[serde(default = "default_ttl")]
    pub event_ttl_seconds: u64,
    /// Maximum number of cached events.
    #[serde(default = "default_max_capacity")]
    pub event_max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            event_ttl_seconds: default_ttl(),
            event_max_capacity: default_max_capacity(),
        }
    }
}

fn default_ttl() -> u64 {
    60
}

fn default_max_capacity() -> u64 {
    10_000
}
