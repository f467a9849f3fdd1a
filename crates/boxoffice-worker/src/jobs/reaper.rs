//! Expiry reaper: reclaims held seats whose hold lapsed and whose lock is gone.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info};

use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;
use boxoffice_database::store::BookingStore;
use boxoffice_entity::seat::SeatStatus;
use boxoffice_lock::LockManager;
use boxoffice_lock::keys::seat_lock;
use boxoffice_realtime::{BroadcastHub, OutboundMessage};

/// Counters from one reaper cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReapReport {
    /// Held seats whose hold had lapsed when the cycle started.
    pub candidates: usize,
    /// Seats returned to available.
    pub reclaimed: usize,
    /// Seats left alone because their lock is still live.
    pub skipped_locked: usize,
    /// Seats skipped because their lock could not be checked.
    pub failed: usize,
}

/// Returns abandoned holds to sale.
///
/// A seat is reclaimed only when it is still held, its hold expiry is in
/// the past, and no live lock exists for it.
#[derive(Debug, Clone)]
pub struct ExpiryReaper {
    /// Record store.
    store: Arc<dyn BookingStore>,
    /// Seat lock coordinator.
    locks: LockManager,
    /// Live feed fan-out.
    hub: Arc<BroadcastHub>,
}

impl ExpiryReaper {
    /// Create a new reaper.
    pub fn new(store: Arc<dyn BookingStore>, locks: LockManager, hub: Arc<BroadcastHub>) -> Self {
        Self { store, locks, hub }
    }

    /// Run one reclamation cycle.
    ///
    /// Candidates are re-read under a row lock inside a single transaction
    /// and all reclaims commit together. Store failures fail the cycle.
    pub async fn run_cycle(&self) -> AppResult<ReapReport> {
        let now = Utc::now();
        let candidates = self.store.expired_holds(now).await?;
        let mut report = ReapReport {
            candidates: candidates.len(),
            ..ReapReport::default()
        };
        if candidates.is_empty() {
            return Ok(report);
        }

        let mut tx = self.store.begin().await?;
        let mut reclaimed = Vec::new();

        for candidate in candidates {
            let Some(mut seat) = tx.seat_for_update(candidate.id).await? else {
                continue;
            };
            if !seat.hold_lapsed(now) {
                debug!(seat_id = %seat.id, "Seat changed since scan, skipping");
                continue;
            }

            match self.locks.is_locked(&seat_lock(seat.id)).await {
                Ok(true) => {
                    debug!(seat_id = %seat.id, "Seat lock still live, skipping");
                    report.skipped_locked += 1;
                }
                Ok(false) => {
                    tx.set_seat_status(seat.id, SeatStatus::Available, None)
                        .await?;
                    seat.status = SeatStatus::Available;
                    seat.hold_expiry = None;
                    reclaimed.push(seat);
                }
                Err(e) => {
                    error!(seat_id = %seat.id, error = %e, "Failed to check seat lock");
                    report.failed += 1;
                }
            }
        }

        if reclaimed.is_empty() {
            tx.rollback().await?;
            return Ok(report);
        }
        tx.commit().await?;

        for seat in &reclaimed {
            self.hub
                .publish(seat.event_id, &OutboundMessage::seat_update(seat, None));
            info!(seat_id = %seat.id, seat_number = %seat.seat_number, "Released expired seat hold");
        }
        report.reclaimed = reclaimed.len();

        info!(
            candidates = report.candidates,
            reclaimed = report.reclaimed,
            skipped_locked = report.skipped_locked,
            failed = report.failed,
            "Expiry reaper cycle complete"
        );
        Ok(report)
    }
}
