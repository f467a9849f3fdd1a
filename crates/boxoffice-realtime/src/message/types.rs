//! Outbound live feed message definitions.

use serde::{Deserialize, Serialize};

use boxoffice_core::types::id::{EventId, SeatId, UserId};
use boxoffice_entity::event::Event;
use boxoffice_entity::seat::{Seat, SeatStatus};

/// A seat as listed in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    /// Seat ID.
    pub id: SeatId,
    /// Display label.
    pub seat_number: String,
    /// Current status.
    pub status: SeatStatus,
}

impl From<&Seat> for SeatSnapshot {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id,
            seat_number: seat.seat_number.clone(),
            status: seat.status,
        }
    }
}

/// Messages sent by the server to feed observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Full state of an event's seats, sent once on subscribe.
    Initial {
        /// Event ID.
        event_id: EventId,
        /// Event display name.
        event_name: String,
        /// Every seat of the event.
        seats: Vec<SeatSnapshot>,
    },
    /// A single seat changed status.
    SeatUpdate {
        /// Seat ID.
        seat_id: SeatId,
        /// Display label.
        seat_number: String,
        /// New status.
        status: SeatStatus,
        /// Principal that caused the change, when one did.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        user_id: Option<UserId>,
    },
    /// Reply to any inbound frame.
    Pong,
}

impl OutboundMessage {
    /// Build the initial snapshot for an event.
    pub fn initial(event: &Event, seats: &[Seat]) -> Self {
        Self::Initial {
            event_id: event.id,
            event_name: event.name.clone(),
            seats: seats.iter().map(SeatSnapshot::from).collect(),
        }
    }

    /// Build a seat update from the seat's new state.
    pub fn seat_update(seat: &Seat, user_id: Option<UserId>) -> Self {
        Self::SeatUpdate {
            seat_id: seat.id,
            seat_number: seat.seat_number.clone(),
            status: seat.status,
            user_id,
        }
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
