//! PostgreSQL record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};
use boxoffice_entity::{Booking, BookingDetail, BookingStatus, Event, NewBooking, Seat, SeatStatus, User};

use super::{BookingStore, StoreTransaction, check_seat_write};

const SEAT_COLUMNS: &str = "id, event_id, seat_number, status, hold_expiry";
const BOOKING_COLUMNS: &str = "id, user_id, event_id, seat_id, status, created_at";

/// Record store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn find_event(&self, id: EventId) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(
            "SELECT id, name, venue, start_time, created_at FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find event", e))
    }

    async fn find_seat(&self, id: SeatId) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>(&format!("SELECT {SEAT_COLUMNS} FROM seats WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find seat", e))
    }

    async fn find_seats(&self, ids: &[SeatId]) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find seats", e))
    }

    async fn seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE event_id = $1 ORDER BY id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list seats for event", e)
        })
    }

    async fn held_seats_for_event(&self, event_id: EventId) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE event_id = $1 AND status = $2 ORDER BY id"
        ))
        .bind(event_id)
        .bind(SeatStatus::Held)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list held seats", e))
    }

    async fn expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE status = $1 AND hold_expiry < $2 ORDER BY id"
        ))
        .bind(SeatStatus::Held)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list expired holds", e)
        })
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn bookings_for_user(&self, user_id: UserId) -> AppResult<Vec<BookingDetail>> {
        sqlx::query_as::<_, BookingDetail>(
            "SELECT b.id, b.user_id, b.event_id, b.seat_id, s.seat_number, b.status, b.created_at \
             FROM bookings b LEFT JOIN seats s ON s.id = b.seat_id \
             WHERE b.user_id = $1 ORDER BY b.created_at DESC, b.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// An open PostgreSQL transaction.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn seat_for_update(&mut self, id: SeatId) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock seat", e))
    }

    async fn set_seat_status(
        &mut self,
        id: SeatId,
        status: SeatStatus,
        hold_expiry: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let current = self
            .seat_for_update(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Seat {id} not found")))?;
        let next = check_seat_write(&current, status, hold_expiry)?;

        sqlx::query("UPDATE seats SET status = $2, hold_expiry = $3 WHERE id = $1")
            .bind(id)
            .bind(next.status)
            .bind(next.hold_expiry)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update seat status", e)
            })?;
        Ok(())
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (user_id, event_id, seat_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking.user_id)
        .bind(booking.event_id)
        .bind(booking.seat_id)
        .bind(booking.status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create booking", e))
    }

    async fn booking_for_update(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock booking", e))
    }

    async fn set_booking_status(&mut self, id: BookingId, status: BookingStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update booking status", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Booking {id} not found")));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { tx } = *self;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let Self { tx } = *self;
        tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
