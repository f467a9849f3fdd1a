//! Seat entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use boxoffice_core::types::id::{EventId, SeatId};

use super::status::SeatStatus;

/// A single seat of an event.
///
/// `hold_expiry` is present exactly when `status` is [`SeatStatus::Held`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Seat {
    /// Unique seat identifier.
    pub id: SeatId,
    /// Owning event. Never changes.
    pub event_id: EventId,
    /// Display label such as `"A12"`.
    pub seat_number: String,
    /// Current status.
    pub status: SeatStatus,
    /// When the current hold lapses.
    pub hold_expiry: Option<DateTime<Utc>>,
}

impl Seat {
    /// Whether this seat belongs to `event_id`.
    pub fn belongs_to(&self, event_id: EventId) -> bool {
        self.event_id == event_id
    }

    /// Whether the seat is held and its hold has lapsed at `now`.
    pub fn hold_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == SeatStatus::Held && self.hold_expiry.is_some_and(|expiry| expiry < now)
    }

    /// Whether status and hold expiry agree.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            SeatStatus::Held => self.hold_expiry.is_some(),
            SeatStatus::Available | SeatStatus::Booked => self.hold_expiry.is_none(),
        }
    }
}
