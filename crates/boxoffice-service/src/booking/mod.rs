//! Seat hold and booking protocols.

pub mod claim;
pub mod service;
pub mod types;


pub use claim::{BatchClaim, ClaimSet, claim_all};
pub use service::BookingService;
pub use types::{
    BookingView, CancelOutcome, FailedSeat, FailureReason, HeldSeat, HoldOutcome,
    MultiHoldOutcome, MyHolds, SettleOutcome,
};
