//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};

use super::status::BookingStatus;

/// A booking of one seat by one user. Never physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Owning user.
    pub user_id: UserId,
    /// Event of the booked seat.
    pub event_id: EventId,
    /// Booked seat.
    pub seat_id: SeatId,
    /// Current status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether `user_id` owns this booking.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// Owning user.
    pub user_id: UserId,
    /// Event of the seat.
    pub event_id: EventId,
    /// Seat being booked.
    pub seat_id: SeatId,
    /// Initial status.
    pub status: BookingStatus,
}

/// A booking joined with its seat label, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookingDetail {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Owning user.
    pub user_id: UserId,
    /// Event of the booked seat.
    pub event_id: EventId,
    /// Booked seat.
    pub seat_id: SeatId,
    /// Seat label, `None` when the seat row no longer exists.
    pub seat_number: Option<String>,
    /// Current status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
}
