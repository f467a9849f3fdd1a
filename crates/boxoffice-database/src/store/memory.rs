//! In-process record store.
//!
//! Committed state lives behind a read/write lock. A transaction takes
//! the single writer slot, works on a private copy of the committed
//! state, and swaps it in on commit. Writers are therefore fully
//! serialized, and readers never observe a half-applied transaction.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};
use boxoffice_entity::{Booking, BookingDetail, BookingStatus, Event, NewBooking, Seat, SeatStatus, User};

use super::{BookingStore, StoreTransaction, check_seat_write};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    events: BTreeMap<EventId, Event>,
    seats: BTreeMap<SeatId, Seat>,
    bookings: BTreeMap<BookingId, Booking>,
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Record store kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    committed: Arc<RwLock<MemoryState>>,
    writer: Arc<Mutex<()>>,
    fail_commits: Arc<AtomicBool>,
}

impl MemoryBookingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> T {
        let state = self.committed.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut state = self.committed.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Add an event.
    pub fn insert_event(&self, name: &str) -> Event {
        self.write(|state| {
            let event = Event {
                id: EventId::new(state.next_id()),
                name: name.to_string(),
                venue: None,
                start_time: None,
                created_at: Utc::now(),
            };
            state.events.insert(event.id, event.clone());
            event
        })
    }

    /// Add an available seat to an event.
    pub fn insert_seat(&self, event_id: EventId, seat_number: &str) -> Seat {
        self.write(|state| {
            let seat = Seat {
                id: SeatId::new(state.next_id()),
                event_id,
                seat_number: seat_number.to_string(),
                status: SeatStatus::Available,
                hold_expiry: None,
            };
            state.seats.insert(seat.id, seat.clone());
            seat
        })
    }

    /// Add a user.
    pub fn insert_user(&self, email: &str) -> User {
        self.write(|state| {
            let user = User {
                id: UserId::new(state.next_id()),
                email: email.to_string(),
            };
            state.users.insert(user.id, user.clone());
            user
        })
    }

    /// Overwrite a seat row as-is, bypassing transactions.
    pub fn put_seat(&self, seat: Seat) {
        self.write(|state| {
            state.seats.insert(seat.id, seat);
        });
    }

    /// Snapshot of every booking, ordered by ID.
    pub fn bookings(&self) -> Vec<Booking> {
        self.read(|state| state.bookings.values().cloned().collect())
    }

    /// Make every subsequent commit fail with a database error until reset.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        let working = self.read(|state| state.clone());
        Ok(Box::new(MemoryTransaction {
            _guard: guard,
            working,
            committed: Arc::clone(&self.committed),
            fail_commits: Arc::clone(&self.fail_commits),
        }))
    }

    async fn find_event(&self, id: EventId) -> AppResult<Option<Event>> {
        Ok(self.read(|state| state.events.get(&id).cloned()))
    }

    async fn find_seat(&self, id: SeatId) -> AppResult<Option<Seat>> {
        Ok(self.read(|state| state.seats.get(&id).cloned()))
    }

    async fn find_seats(&self, ids: &[SeatId]) -> AppResult<Vec<Seat>> {
        Ok(self.read(|state| {
            ids.iter()
                .filter_map(|id| state.seats.get(id).cloned())
                .collect()
        }))
    }

    async fn seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>> {
        Ok(self.read(|state| {
            state
                .seats
                .values()
                .filter(|seat| seat.event_id == event_id)
                .cloned()
                .collect()
        }))
    }

    async fn held_seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>> {
        Ok(self.read(|state| {
            state
                .seats
                .values()
                .filter(|seat| seat.event_id == event_id && seat.status == SeatStatus::Held)
                .cloned()
                .collect()
        }))
    }

    async fn expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Seat>> {
        Ok(self.read(|state| {
            state
                .seats
                .values()
                .filter(|seat| seat.hold_lapsed(now))
                .cloned()
                .collect()
        }))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.read(|state| state.users.values().find(|u| u.email == email).cloned()))
    }

    async fn bookings_for_user(&self, user_id: UserId) -> AppResult<Vec<BookingDetail>> {
        Ok(self.read(|state| {
            let mut details: Vec<BookingDetail> = state
                .bookings
                .values()
                .filter(|b| b.user_id == user_id)
                .map(|b| BookingDetail {
                    id: b.id,
                    user_id: b.user_id,
                    event_id: b.event_id,
                    seat_id: b.seat_id,
                    seat_number: state.seats.get(&b.seat_id).map(|s| s.seat_number.clone()),
                    status: b.status,
                    created_at: b.created_at,
                })
                .collect();
            details.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            details
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// A transaction over [`MemoryBookingStore`].
struct MemoryTransaction {
    _guard: OwnedMutexGuard<()>,
    working: MemoryState,
    committed: Arc<RwLock<MemoryState>>,
    fail_commits: Arc<AtomicBool>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn seat_for_update(&mut self, id: SeatId) -> AppResult<Option<Seat>> {
        Ok(self.working.seats.get(&id).cloned())
    }

    async fn set_seat_status(
        &mut self,
        id: SeatId,
        status: SeatStatus,
        hold_expiry: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let seat = self
            .working
            .seats
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Seat {id} not found")))?;
        *seat = check_seat_write(seat, status, hold_expiry)?;
        Ok(())
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> AppResult<Booking> {
        let row = Booking {
            id: BookingId::new(self.working.next_id()),
            user_id: booking.user_id,
            event_id: booking.event_id,
            seat_id: booking.seat_id,
            status: booking.status,
            created_at: Utc::now(),
        };
        self.working.bookings.insert(row.id, row.clone());
        Ok(row)
    }

    async fn booking_for_update(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.working.bookings.get(&id).cloned())
    }

    async fn set_booking_status(&mut self, id: BookingId, status: BookingStatus) -> AppResult<()> {
        let booking = self
            .working
            .bookings
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;
        booking.status = status;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(AppError::database("Failed to commit transaction"));
        }
        let Self {
            _guard,
            working,
            committed,
            ..
        } = *self;
        *committed.write().unwrap_or_else(PoisonError::into_inner) = working;
        debug!("Memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
