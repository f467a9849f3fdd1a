//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use boxoffice_core::types::id::EventId;

/// An event whose seats are being sold.
///
/// Catalog fields beyond the name are carried for display only; the
/// booking engine never mutates events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Venue name.
    pub venue: Option<String>,
    /// Scheduled start.
    pub start_time: Option<DateTime<Utc>>,
    /// When the event row was created.
    pub created_at: DateTime<Utc>,
}
