//! # boxoffice-database
//!
//! PostgreSQL connection management and the transactional record store
//! for seats and bookings. Two store backends implement the same
//! [`BookingStore`] contract: PostgreSQL and an in-process store used in
//! development and tests.

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BookingStore, StoreTransaction};
