//! # boxoffice-entity
//!
//! Domain entity models for BoxOffice. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod booking;
pub mod event;
pub mod seat;
pub mod user;

pub use booking::{Booking, BookingDetail, BookingStatus, NewBooking};
pub use event::Event;
pub use seat::{Seat, SeatStatus};
pub use user::User;
