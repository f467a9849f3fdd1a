//! Booking domain entities.

pub mod model;
pub mod status;

pub use model::{Booking, BookingDetail, NewBooking};
pub use status::BookingStatus;
