//! Seat status enumeration and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a seat.
///
/// `available → held → booked`, with `held → available` on release or
/// expiry and `booked → available` on booking cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Free to be held.
    Available,
    /// Reserved by one principal until its hold expires.
    Held,
    /// Sold.
    Booked,
}

impl SeatStatus {
    /// Whether `self → next` is a legal transition.
    ///
    /// `held → held` is allowed so that a seat whose lock lapsed can be
    /// taken over by a new hold before the reaper reclaims it.
    pub fn can_transition_to(&self, next: SeatStatus) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Held)
                | (Self::Held, Self::Held)
                | (Self::Held, Self::Booked)
                | (Self::Held, Self::Available)
                | (Self::Booked, Self::Available)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Held => "held",
            Self::Booked => "booked",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booked_requires_hold() {
        assert!(!SeatStatus::Available.can_transition_to(SeatStatus::Booked));
        assert!(SeatStatus::Held.can_transition_to(SeatStatus::Booked));
    }

    #[test]
    fn test_booked_is_not_reheld() {
        assert!(!SeatStatus::Booked.can_transition_to(SeatStatus::Held));
        assert!(SeatStatus::Booked.can_transition_to(SeatStatus::Available));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SeatStatus::Held).unwrap();
        assert_eq!(json, "\"held\"");
    }
}
