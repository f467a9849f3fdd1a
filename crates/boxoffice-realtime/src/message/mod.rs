//! Frames pushed to live feed observers.

mod types;

pub use types::{OutboundMessage, SeatSnapshot};
