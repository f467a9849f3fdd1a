//! Lock key builders.

use boxoffice_core::types::id::SeatId;

const SEAT_LOCK_PREFIX: &str = "seat_lock";

/// Lock key guarding a seat.
pub fn seat_lock(seat_id: SeatId) -> String {
    format!("{SEAT_LOCK_PREFIX}:{seat_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_lock_key() {
        assert_eq!(seat_lock(SeatId::new(12)), "seat_lock:12");
    }
}
