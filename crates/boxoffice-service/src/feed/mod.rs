//! Seat listings and live feed subscriptions.

pub mod cache;
pub mod service;

pub use cache::EventCache;
pub use service::{EventSeats, FeedSubscription, SeatFeedService};
