//! Background reaper configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Expiry reaper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Whether the reaper runs in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between reclamation cycles.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
        }
    }
}

impl ReaperConfig {
    /// Cycle interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Validate the interval.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.interval_seconds == 0 {
            return Err(AppError::configuration(
                "reaper.interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    10
}
