//! Response DTOs.
//!
//! Most booking outcomes are serialized as the service returns them. The
//! settle responses rename the seat list per operation.

use serde::{Deserialize, Serialize};

use boxoffice_core::types::id::SeatId;
use boxoffice_service::booking::{FailedSeat, SettleOutcome};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// Service name.
    pub service: String,
}

/// Dependency health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"healthy"` or `"degraded"`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Lock coordinator reachability.
    pub lock_coordinator: String,
    /// Events with at least one live observer.
    pub observed_events: usize,
}

/// Confirm response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    /// Whether every requested seat was booked.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Seats now booked.
    pub confirmed_seats: Vec<SeatId>,
    /// Seats that were skipped.
    pub failed_seats: Vec<FailedSeat>,
}

impl From<SettleOutcome> for ConfirmResponse {
    fn from(outcome: SettleOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            confirmed_seats: outcome.seats,
            failed_seats: outcome.failed_seats,
        }
    }
}

/// Release response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Seats returned to sale.
    pub released_seats: Vec<SeatId>,
    /// Seats that were skipped.
    pub failed_seats: Vec<FailedSeat>,
}

impl From<SettleOutcome> for ReleaseResponse {
    fn from(outcome: SettleOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            released_seats: outcome.seats,
            failed_seats: outcome.failed_seats,
        }
    }
}
