//! Result types returned by the booking protocols.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};
use boxoffice_core::types::timestamp::{wire, wire_option};
use boxoffice_entity::booking::{BookingDetail, BookingStatus};

/// Why a seat could not be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Another principal owns the seat's lock.
    HeldByAnotherUser,
    /// The seat is already sold.
    AlreadyBooked,
    /// The caller does not own the seat's lock.
    NotHeldByCaller,
    /// The seat is not in the held state.
    NotHeld,
    /// The seat does not exist.
    SeatNotFound,
}

impl FailureReason {
    /// Human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::HeldByAnotherUser => "Already held by another user",
            Self::AlreadyBooked => "Seat is already booked",
            Self::NotHeldByCaller => "Seat is not held by you",
            Self::NotHeld => "Seat is not on hold",
            Self::SeatNotFound => "Seat not found",
        }
    }
}

/// A seat that blocked or was skipped by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSeat {
    /// Seat ID.
    pub seat_id: SeatId,
    /// Seat label, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
    /// Machine-readable reason.
    pub reason: FailureReason,
    /// Human-readable reason.
    pub detail: String,
}

impl FailedSeat {
    /// Creates a failure entry.
    pub fn new(seat_id: SeatId, seat_number: Option<String>, reason: FailureReason) -> Self {
        Self {
            seat_id,
            seat_number,
            reason,
            detail: reason.describe().to_string(),
        }
    }
}

/// Outcome of a single-seat hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldOutcome {
    /// Whether the caller holds the seat afterwards.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Seat ID.
    pub seat_id: SeatId,
    /// When the hold lapses.
    #[serde(with = "wire_option", default)]
    pub hold_expires_at: Option<DateTime<Utc>>,
}

/// Outcome of an all-or-nothing multi-seat hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiHoldOutcome {
    /// Whether every seat is now held by the caller.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Seats now held, in request order. Empty on failure.
    pub held_seats: Vec<SeatId>,
    /// Seats that blocked the request.
    pub failed_seats: Vec<FailedSeat>,
    /// Shared expiry of the new holds.
    #[serde(with = "wire_option", default)]
    pub hold_expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a confirm or release call. Partial success is reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleOutcome {
    /// Whether the call settled every requested seat.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Seats that were settled, in request order.
    pub seats: Vec<SeatId>,
    /// Seats that were skipped.
    pub failed_seats: Vec<FailedSeat>,
}

/// Outcome of a booking cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// Always `true`; failures are errors.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Cancelled booking.
    pub booking_id: BookingId,
}

/// One of the caller's live holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldSeat {
    /// Seat ID.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_number: String,
    /// Seconds left on the seat's lock.
    pub expires_in_seconds: u64,
}

/// The caller's live holds in one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyHolds {
    /// Event ID.
    pub event_id: EventId,
    /// Held seats ordered by seat ID.
    pub held_seats: Vec<HeldSeat>,
    /// Earliest lock expiry across the held seats.
    #[serde(with = "wire_option", default)]
    pub hold_expires_at: Option<DateTime<Utc>>,
}

/// A booking as listed to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingView {
    /// Booking ID.
    pub id: BookingId,
    /// Owner.
    pub user_id: UserId,
    /// Event.
    pub event_id: EventId,
    /// Seat.
    pub seat_id: SeatId,
    /// Seat label, `"Unknown"` if the seat row is gone.
    pub seat_number: String,
    /// Booking status.
    pub status: BookingStatus,
    /// Creation time.
    #[serde(with = "wire")]
    pub created_at: DateTime<Utc>,
}

impl From<BookingDetail> for BookingView {
    fn from(detail: BookingDetail) -> Self {
        Self {
            id: detail.id,
            user_id: detail.user_id,
            event_id: detail.event_id,
            seat_id: detail.seat_id,
            seat_number: detail.seat_number.unwrap_or_else(|| "Unknown".to_string()),
            status: detail.status,
            created_at: detail.created_at,
        }
    }
}
