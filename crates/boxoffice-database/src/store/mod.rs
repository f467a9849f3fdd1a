//! Record store contract for seats and bookings.
//!
//! Reads that do not feed a write go through [`BookingStore`] directly.
//! Every mutation happens inside a [`StoreTransaction`], which has a
//! single commit point. Dropping a transaction without committing it
//! discards its writes.

#[cfg(feature = "memory")]
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use boxoffice_core::config::{StoreConfig, StoreProvider};
use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};
use boxoffice_entity::{Booking, BookingDetail, BookingStatus, Event, NewBooking, Seat, SeatStatus, User};

#[cfg(feature = "memory")]
pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

/// Read access to seats, bookings, and events plus a transaction factory.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a transaction.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;

    /// Find an event by ID.
    async fn find_event(&self, id: EventId) -> AppResult<Option<Event>>;

    /// Find a seat by ID.
    async fn find_seat(&self, id: SeatId) -> AppResult<Option<Seat>>;

    /// Find every seat in `ids` that exists. Order is unspecified.
    async fn find_seats(&self, ids: &[SeatId]) -> AppResult<Vec<Seat>>;

    /// All seats of an event ordered by ID.
    async fn seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>>;

    /// Held seats of an event ordered by ID.
    async fn held_seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>>;

    /// Held seats whose hold expired before `now`, ordered by ID.
    async fn expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Seat>>;

    /// Find a user by login e-mail.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Bookings of a user, newest first, joined with seat labels.
    async fn bookings_for_user(&self, user_id: UserId) -> AppResult<Vec<BookingDetail>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// A unit of work against the record store.
///
/// Rows read with the `_for_update` methods stay locked against other
/// transactions until commit or rollback.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Read and lock a seat.
    async fn seat_for_update(&mut self, id: SeatId) -> AppResult<Option<Seat>>;

    /// Write a seat's status and hold expiry.
    ///
    /// Fails unless `hold_expiry` is present exactly when `status` is
    /// [`SeatStatus::Held`].
    async fn set_seat_status(
        &mut self,
        id: SeatId,
        status: SeatStatus,
        hold_expiry: Option<DateTime<Utc>>,
    ) -> AppResult<()>;

    /// Insert a booking and return the stored row.
    async fn insert_booking(&mut self, booking: &NewBooking) -> AppResult<Booking>;

    /// Read and lock a booking.
    async fn booking_for_update(&mut self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Write a booking's status.
    async fn set_booking_status(&mut self, id: BookingId, status: BookingStatus) -> AppResult<()>;

    /// Make every write of this transaction visible at once.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Build the configured store backend.
pub fn build_store(
    config: &StoreConfig,
    pool: Option<&crate::connection::DatabasePool>,
) -> AppResult<Arc<dyn BookingStore>> {
    match config.provider {
        StoreProvider::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::configuration("store.provider = \"postgres\" requires a database pool")
            })?;
            Ok(Arc::new(PgBookingStore::new(pool.pool().clone())))
        }
        #[cfg(feature = "memory")]
        StoreProvider::Memory => Ok(Arc::new(MemoryBookingStore::new())),
        #[cfg(not(feature = "memory"))]
        StoreProvider::Memory => Err(AppError::configuration(
            "store.provider = \"memory\" requires the `memory` feature",
        )),
    }
}

/// Validate a seat write against the row it replaces and return the new row.
///
/// The status change must be a legal transition and the result must keep
/// `hold_expiry` present exactly while the seat is held.
pub(crate) fn check_seat_write(
    current: &Seat,
    status: SeatStatus,
    hold_expiry: Option<DateTime<Utc>>,
) -> AppResult<Seat> {
    if !current.status.can_transition_to(status) {
        return Err(AppError::invalid_state(format!(
            "Seat {} cannot move from {} to {status}",
            current.id, current.status
        )));
    }
    let next = Seat {
        status,
        hold_expiry,
        ..current.clone()
    };
    if !next.is_consistent() {
        return Err(AppError::internal(format!(
            "Seat {} cannot be {status} with hold expiry {hold_expiry:?}",
            current.id
        )));
    }
    Ok(next)
}
