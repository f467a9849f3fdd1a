//! Booking orchestrator: hold, confirm, release and cancel protocols.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use boxoffice_core::config::BookingConfig;
use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;
use boxoffice_core::types::id::{BookingId, EventId, SeatId, UserId};
use boxoffice_database::store::{BookingStore, StoreTransaction};
use boxoffice_entity::booking::{BookingStatus, NewBooking};
use boxoffice_entity::seat::{Seat, SeatStatus};
use boxoffice_lock::LockManager;
use boxoffice_lock::keys::seat_lock;
use boxoffice_realtime::{BroadcastHub, OutboundMessage};

use super::claim::{BatchClaim, claim_all};
use super::types::{
    BookingView, CancelOutcome, FailedSeat, FailureReason, HeldSeat, HoldOutcome,
    MultiHoldOutcome, MyHolds, SettleOutcome,
};
use crate::context::RequestContext;

/// Implements the seat hold/booking protocols.
///
/// The lock coordinator decides who may act on a seat, the record store
/// holds the seat's persisted status, and every committed change is
/// pushed to the event's observers.
#[derive(Debug, Clone)]
pub struct BookingService {
    /// Record store.
    store: Arc<dyn BookingStore>,
    /// Seat lock coordinator.
    locks: LockManager,
    /// Live feed fan-out.
    hub: Arc<BroadcastHub>,
    /// Timing and batch limits.
    config: BookingConfig,
}

/// What a confirm or release call turns a held seat into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Confirm,
    Release,
}

impl Settlement {
    fn target(self) -> SeatStatus {
        match self {
            Self::Confirm => SeatStatus::Booked,
            Self::Release => SeatStatus::Available,
        }
    }
}

/// Result of writing new holds.
enum HoldWrite {
    Written(Vec<Seat>),
    Blocked(Vec<FailedSeat>),
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        locks: LockManager,
        hub: Arc<BroadcastHub>,
        config: BookingConfig,
    ) -> Self {
        Self {
            store,
            locks,
            hub,
            config,
        }
    }

    /// Hold a single seat for the caller.
    pub async fn hold(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        seat_id: SeatId,
    ) -> AppResult<HoldOutcome> {
        let seat = self
            .store
            .find_seat(seat_id)
            .await?
            .ok_or_else(|| AppError::not_found("Seat not found"))?;

        if !seat.belongs_to(event_id) {
            return Err(AppError::validation("Seat does not belong to this event"));
        }

        let key = seat_lock(seat_id);
        let owner = ctx.lock_owner();

        if !self
            .locks
            .try_acquire(&key, &owner, self.config.lock_ttl())
            .await?
        {
            if self.locks.current_owner(&key).await?.as_deref() == Some(owner.as_str()) {
                let remaining = self.locks.remaining_ttl(&key).await?.unwrap_or_default();
                return Ok(HoldOutcome {
                    success: true,
                    message: "You already have this seat on hold".to_string(),
                    seat_id,
                    hold_expires_at: Some(Utc::now() + to_delta(remaining)),
                });
            }
            return Ok(HoldOutcome {
                success: false,
                message: "This seat is currently held by another user".to_string(),
                seat_id,
                hold_expires_at: None,
            });
        }

        let expiry = Utc::now() + self.config.hold_delta();
        let written = match self.write_holds(std::slice::from_ref(&seat), expiry).await {
            Ok(written) => written,
            Err(e) => {
                self.drop_lock(seat_id, &owner).await;
                return Err(e);
            }
        };

        match written {
            HoldWrite::Written(seats) => {
                self.broadcast(&seats, Some(ctx.user_id));
                info!(%seat_id, user_id = %ctx.user_id, %expiry, "Seat held");
                Ok(HoldOutcome {
                    success: true,
                    message: format!("Seat successfully held for {}", self.config.hold_label()),
                    seat_id,
                    hold_expires_at: Some(expiry),
                })
            }
            HoldWrite::Blocked(failed) => {
                self.drop_lock(seat_id, &owner).await;
                let detail = failed
                    .first()
                    .map(|f| f.detail.clone())
                    .unwrap_or_else(|| FailureReason::AlreadyBooked.describe().to_string());
                Ok(HoldOutcome {
                    success: false,
                    message: detail,
                    seat_id,
                    hold_expires_at: None,
                })
            }
        }
    }

    /// Hold several seats of one event, all or nothing.
    pub async fn hold_multiple(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        seat_ids: &[SeatId],
    ) -> AppResult<MultiHoldOutcome> {
        let seats = self.load_hold_batch(event_id, seat_ids).await?;
        let owner = ctx.lock_owner();

        let claims = match claim_all(&self.locks, &owner, self.config.lock_ttl(), &seats).await? {
            BatchClaim::Granted(claims) => claims,
            BatchClaim::Rejected(failed) => {
                info!(%event_id, user_id = %ctx.user_id, failed = failed.len(), "Multi-seat hold rejected");
                return Ok(Self::rejected_batch(failed));
            }
        };

        let expiry = Utc::now() + self.config.hold_delta();
        match self.write_holds(&seats, expiry).await {
            Ok(HoldWrite::Written(held)) => {
                self.broadcast(&held, Some(ctx.user_id));
                info!(%event_id, user_id = %ctx.user_id, count = held.len(), %expiry, "Seats held");
                Ok(MultiHoldOutcome {
                    success: true,
                    message: format!(
                        "Successfully held {} seat(s) for {}",
                        held.len(),
                        self.config.hold_label()
                    ),
                    held_seats: held.iter().map(|s| s.id).collect(),
                    failed_seats: Vec::new(),
                    hold_expires_at: Some(expiry),
                })
            }
            Ok(HoldWrite::Blocked(failed)) => {
                claims.compensate(&self.locks, &owner).await;
                Ok(Self::rejected_batch(failed))
            }
            Err(e) => {
                claims.compensate(&self.locks, &owner).await;
                Err(e)
            }
        }
    }

    /// Book seats the caller holds. Seats the caller does not hold are
    /// reported and skipped.
    pub async fn confirm(
        &self,
        ctx: &RequestContext,
        seat_ids: &[SeatId],
    ) -> AppResult<SettleOutcome> {
        let (settled, failed) = self.settle(ctx, seat_ids, Settlement::Confirm).await?;

        let message = if failed.is_empty() {
            format!("Successfully confirmed {} booking(s)", settled.len())
        } else {
            format!(
                "Confirmed {} seat(s), failed {}",
                settled.len(),
                failed.len()
            )
        };
        Ok(SettleOutcome {
            success: failed.is_empty(),
            message,
            seats: settled.iter().map(|s| s.id).collect(),
            failed_seats: failed,
        })
    }

    /// Give back seats the caller holds.
    pub async fn release(
        &self,
        ctx: &RequestContext,
        seat_ids: &[SeatId],
    ) -> AppResult<SettleOutcome> {
        let (settled, failed) = self.settle(ctx, seat_ids, Settlement::Release).await?;

        Ok(SettleOutcome {
            success: true,
            message: format!("Released {} seat(s)", settled.len()),
            seats: settled.iter().map(|s| s.id).collect(),
            failed_seats: failed,
        })
    }

    /// Cancel one of the caller's bookings and free its seat.
    pub async fn cancel_booking(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
    ) -> AppResult<CancelOutcome> {
        let mut tx = self.store.begin().await?;

        let booking = tx
            .booking_for_update(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        if !booking.is_owned_by(ctx.user_id) {
            return Err(AppError::ownership_conflict(
                "Booking belongs to another user",
            ));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::invalid_state("Booking already cancelled"));
        }

        let mut seat = tx
            .seat_for_update(booking.seat_id)
            .await?
            .ok_or_else(|| AppError::not_found("Seat not found"))?;

        tx.set_booking_status(booking_id, BookingStatus::Cancelled)
            .await?;
        tx.set_seat_status(seat.id, SeatStatus::Available, None)
            .await?;
        tx.commit().await?;

        seat.status = SeatStatus::Available;
        seat.hold_expiry = None;
        self.broadcast(std::slice::from_ref(&seat), None);

        info!(%booking_id, seat_id = %seat.id, user_id = %ctx.user_id, "Booking cancelled");
        Ok(CancelOutcome {
            success: true,
            message: "Booking cancelled successfully".to_string(),
            booking_id,
        })
    }

    /// The caller's live holds in an event.
    pub async fn my_holds(&self, ctx: &RequestContext, event_id: EventId) -> AppResult<MyHolds> {
        let owner = ctx.lock_owner();
        let now = Utc::now();
        let mut held_seats = Vec::new();
        let mut earliest: Option<DateTime<Utc>> = None;

        for seat in self.store.held_seats_for_event(event_id).await? {
            let key = seat_lock(seat.id);
            if self.locks.current_owner(&key).await?.as_deref() != Some(owner.as_str()) {
                continue;
            }
            let Some(remaining) = self.locks.remaining_ttl(&key).await? else {
                continue;
            };

            let expiry = now + to_delta(remaining);
            earliest = Some(earliest.map_or(expiry, |current| current.min(expiry)));
            held_seats.push(HeldSeat {
                seat_id: seat.id,
                seat_number: seat.seat_number,
                expires_in_seconds: remaining.as_secs(),
            });
        }

        Ok(MyHolds {
            event_id,
            held_seats,
            hold_expires_at: earliest,
        })
    }

    /// Every booking of the caller, newest first.
    pub async fn my_bookings(&self, ctx: &RequestContext) -> AppResult<Vec<BookingView>> {
        let bookings = self.store.bookings_for_user(ctx.user_id).await?;
        Ok(bookings.into_iter().map(BookingView::from).collect())
    }

    /// Validate a multi-seat hold request and return its seats in request
    /// order. Nothing is locked or written.
    async fn load_hold_batch(&self, event_id: EventId, seat_ids: &[SeatId]) -> AppResult<Vec<Seat>> {
        if seat_ids.is_empty() {
            return Err(AppError::validation("No seats provided"));
        }
        let max = self.config.max_seats_per_hold;
        if seat_ids.len() > max {
            return Err(AppError::validation(format!(
                "Cannot hold more than {max} seats at once"
            )));
        }

        let ids = distinct(seat_ids);
        let mut found: HashMap<SeatId, Seat> = self
            .store
            .find_seats(&ids)
            .await?
            .into_iter()
            .map(|seat| (seat.id, seat))
            .collect();

        if found.len() != ids.len() {
            return Err(AppError::not_found("One or more seats not found"));
        }

        let events: HashSet<EventId> = found.values().map(|seat| seat.event_id).collect();
        if events.len() > 1 {
            return Err(AppError::validation("All seats must belong to the same event"));
        }
        if !events.contains(&event_id) {
            return Err(AppError::validation("Seats do not belong to specified event"));
        }

        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }

    /// Persist new holds in one transaction. Seats that are sold (or gone)
    /// block the whole write.
    async fn write_holds(&self, seats: &[Seat], expiry: DateTime<Utc>) -> AppResult<HoldWrite> {
        let mut tx = self.store.begin().await?;
        let mut rows = Vec::with_capacity(seats.len());
        let mut blocked = Vec::new();

        for seat in seats {
            match tx.seat_for_update(seat.id).await? {
                None => blocked.push(FailedSeat::new(
                    seat.id,
                    Some(seat.seat_number.clone()),
                    FailureReason::SeatNotFound,
                )),
                Some(row) if row.status == SeatStatus::Booked => blocked.push(FailedSeat::new(
                    row.id,
                    Some(row.seat_number),
                    FailureReason::AlreadyBooked,
                )),
                Some(row) => rows.push(row),
            }
        }

        if !blocked.is_empty() {
            tx.rollback().await?;
            return Ok(HoldWrite::Blocked(blocked));
        }

        for row in &mut rows {
            tx.set_seat_status(row.id, SeatStatus::Held, Some(expiry))
                .await?;
            row.status = SeatStatus::Held;
            row.hold_expiry = Some(expiry);
        }
        tx.commit().await?;

        Ok(HoldWrite::Written(rows))
    }

    /// Shared confirm/release pass: one transaction, locks released only
    /// after it commits.
    async fn settle(
        &self,
        ctx: &RequestContext,
        seat_ids: &[SeatId],
        settlement: Settlement,
    ) -> AppResult<(Vec<Seat>, Vec<FailedSeat>)> {
        if seat_ids.is_empty() {
            return Err(AppError::validation("No seats provided"));
        }

        let owner = ctx.lock_owner();
        let mut tx = self.store.begin().await?;
        let mut settled = Vec::new();
        let mut failed = Vec::new();

        for seat_id in distinct(seat_ids) {
            if self.locks.current_owner(&seat_lock(seat_id)).await?.as_deref()
                != Some(owner.as_str())
            {
                failed.push(FailedSeat::new(seat_id, None, FailureReason::NotHeldByCaller));
                continue;
            }

            match tx.seat_for_update(seat_id).await? {
                None => failed.push(FailedSeat::new(seat_id, None, FailureReason::SeatNotFound)),
                Some(seat) if seat.status != SeatStatus::Held => failed.push(FailedSeat::new(
                    seat_id,
                    Some(seat.seat_number),
                    FailureReason::NotHeld,
                )),
                Some(seat) => {
                    let seat = Self::apply_settlement(&mut tx, ctx.user_id, seat, settlement).await?;
                    settled.push(seat);
                }
            }
        }

        if settled.is_empty() {
            tx.rollback().await?;
            return Ok((settled, failed));
        }
        tx.commit().await?;

        for seat in &settled {
            self.drop_lock(seat.id, &owner).await;
        }

        let actor = match settlement {
            Settlement::Confirm => Some(ctx.user_id),
            Settlement::Release => None,
        };
        self.broadcast(&settled, actor);

        info!(
            user_id = %ctx.user_id,
            settlement = ?settlement,
            settled = settled.len(),
            failed = failed.len(),
            "Seats settled"
        );
        Ok((settled, failed))
    }

    async fn apply_settlement(
        tx: &mut Box<dyn StoreTransaction>,
        user_id: UserId,
        mut seat: Seat,
        settlement: Settlement,
    ) -> AppResult<Seat> {
        let target = settlement.target();
        tx.set_seat_status(seat.id, target, None).await?;

        if settlement == Settlement::Confirm {
            tx.insert_booking(&NewBooking {
                user_id,
                event_id: seat.event_id,
                seat_id: seat.id,
                status: BookingStatus::Confirmed,
            })
            .await?;
        }

        seat.status = target;
        seat.hold_expiry = None;
        Ok(seat)
    }

    fn rejected_batch(failed: Vec<FailedSeat>) -> MultiHoldOutcome {
        MultiHoldOutcome {
            success: false,
            message: format!("Failed to hold {} seat(s). All locks released.", failed.len()),
            held_seats: Vec::new(),
            failed_seats: failed,
            hold_expires_at: None,
        }
    }

    /// Release a seat lock if the caller still owns it. Failures are
    /// logged; the lock then lapses with its TTL.
    async fn drop_lock(&self, seat_id: SeatId, owner: &str) {
        if let Err(e) = self.locks.release_if_owner(&seat_lock(seat_id), owner).await {
            warn!(%seat_id, owner, error = %e, "Failed to release seat lock");
        }
    }

    fn broadcast(&self, seats: &[Seat], user_id: Option<UserId>) {
        for seat in seats {
            self.hub
                .publish(seat.event_id, &OutboundMessage::seat_update(seat, user_id));
        }
    }
}

/// First occurrence of each ID, in order.
fn distinct(ids: &[SeatId]) -> Vec<SeatId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn to_delta(duration: std::time::Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::zero())
}
