//! Live seat feed configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound message buffer per observer. A full buffer counts as a
    /// delivery failure and drops the observer.
    #[serde(default = "default_buffer")]
    pub observer_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            observer_buffer_size: default_buffer(),
        }
    }
}

fn default_buffer() -> usize {
    256
}
