//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use boxoffice_core::types::id::{EventId, SeatId};

/// Single-seat hold request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldRequest {
    /// Event the seat belongs to.
    pub event_id: EventId,
    /// Seat to hold.
    pub seat_id: SeatId,
}

/// Multi-seat hold request. Count limits are enforced by the booking
/// service so that the configured maximum applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldMultipleRequest {
    /// Event the seats belong to.
    pub event_id: EventId,
    /// Seats to hold, all or nothing.
    #[serde(default)]
    pub seat_ids: Vec<SeatId>,
}

/// Confirm or release request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeatIdsRequest {
    /// Seats to act on.
    #[serde(default)]
    #[validate(length(min = 1, message = "No seats provided"))]
    pub seat_ids: Vec<SeatId>,
}
