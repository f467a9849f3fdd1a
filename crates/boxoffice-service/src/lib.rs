//! # boxoffice-service
//!
//! Business logic for BoxOffice. [`BookingService`] implements the seat
//! hold, confirm, release and cancel protocols on top of the lock
//! coordinator, the record store and the broadcast hub.
//! [`SeatFeedService`] serves seat listings and live feed subscriptions.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time.

pub mod booking;
pub mod context;
pub mod feed;

pub use booking::BookingService;
pub use context::RequestContext;
pub use feed::{EventCache, SeatFeedService};
