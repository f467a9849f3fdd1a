//! Hold and booking protocol configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Timing and batch limits for the hold/confirm protocol.
///
/// The lock TTL is the authority on who may act on a seat. The persisted
/// hold expiry is derived from `hold_duration_seconds` and must never
/// outlive the lock that protects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// TTL of a seat lock in seconds.
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_seconds: u64,
    /// Length of a seat hold in seconds.
    #[serde(default = "default_hold_duration")]
    pub hold_duration_seconds: u64,
    /// Maximum number of seats in one multi-seat hold.
    #[serde(default = "default_max_seats")]
    pub max_seats_per_hold: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lock_ttl_seconds: default_lock_ttl(),
            hold_duration_seconds: default_hold_duration(),
            max_seats_per_hold: default_max_seats(),
        }
    }
}

impl BookingConfig {
    /// Lock TTL as a [`Duration`].
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_seconds)
    }

    /// Hold length as a [`Duration`].
    pub fn hold_duration(&self) -> Duration {
        Duration::from_secs(self.hold_duration_seconds)
    }

    /// Hold length as a chrono duration for timestamp arithmetic.
    pub fn hold_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(self.hold_duration_seconds as i64)
    }

    /// Human-readable hold length used in response messages.
    pub fn hold_label(&self) -> String {
        let secs = self.hold_duration_seconds;
        if secs % 60 == 0 {
            format!("{} minutes", secs / 60)
        } else {
            format!("{secs} seconds")
        }
    }

    /// Validate timing invariants.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.hold_duration_seconds == 0 {
            return Err(AppError::configuration(
                "booking.hold_duration_seconds must be greater than zero",
            ));
        }
        if self.max_seats_per_hold == 0 {
            return Err(AppError::configuration(
                "booking.max_seats_per_hold must be greater than zero",
            ));
        }
        if self.lock_ttl_seconds < self.hold_duration_seconds {
            return Err(AppError::configuration(format!(
                "booking.lock_ttl_seconds ({}) must be >= booking.hold_duration_seconds ({})",
                self.lock_ttl_seconds, self.hold_duration_seconds
            )));
        }
        Ok(())
    }
}

fn default_lock_ttl() -> u64 {
    300
}

fn default_hold_duration() -> u64 {
    300
}

fn default_max_seats() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_label() {
        let mut config = BookingConfig::default();
        assert_eq!(config.hold_label(), "5 minutes");
        config.hold_duration_seconds = 90;
        assert_eq!(config.hold_label(), "90 seconds");
    }

    #[test]
    fn test_equal_ttl_and_hold_is_valid() {
        let config = BookingConfig {
            lock_ttl_seconds: 60,
            hold_duration_seconds: 60,
            max_seats_per_hold: 4,
        };
        assert!(config.validate().is_ok());
    }
}
