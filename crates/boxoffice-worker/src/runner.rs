//! Reaper runner: repeats the expiry reaper on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::jobs::reaper::ExpiryReaper;

/// Runs reaper cycles until cancelled.
///
/// Each cycle runs in its own task, so neither an error nor a panic in a
/// cycle ends the schedule; the next tick simply tries again.
#[derive(Debug)]
pub struct ReaperRunner {
    /// The job to repeat.
    reaper: Arc<ExpiryReaper>,
    /// Time between cycles.
    interval: Duration,
}

impl ReaperRunner {
    /// Create a new runner.
    pub fn new(reaper: Arc<ExpiryReaper>, interval: Duration) -> Self {
        Self { reaper, interval }
    }

    /// Run until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(interval_seconds = self.interval.as_secs(), "Expiry reaper started");

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Expiry reaper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => self.tick().await,
            }
        }

        info!("Expiry reaper stopped");
    }

    async fn tick(&self) {
        let reaper = Arc::clone(&self.reaper);
        match tokio::spawn(async move { reaper.run_cycle().await }).await {
            Ok(Ok(report)) if report.candidates > 0 => {
                debug!(?report, "Expiry reaper cycle finished");
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => error!(error = %e, "Expiry reaper cycle failed"),
            Err(e) => error!(error = %e, "Expiry reaper cycle panicked"),
        }
    }
}

/// A running reaper with an explicit stop.
#[derive(Debug)]
pub struct ReaperHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Start the runner on the current runtime.
    pub fn spawn(runner: ReaperRunner) -> Self {
        let (cancel, receiver) = watch::channel(false);
        let task = tokio::spawn(async move { runner.run(receiver).await });
        Self { cancel, task }
    }

    /// Signal the runner and wait for the in-flight cycle to finish.
    pub async fn stop(self) {
        if self.cancel.send(true).is_err() {
            debug!("Expiry reaper already exited");
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Expiry reaper task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::types::id::SeatId;
    use boxoffice_database::store::BookingStore;
    use boxoffice_database::store::memory::MemoryBookingStore;
    use boxoffice_entity::seat::SeatStatus;
    use boxoffice_lock::LockManager;
    use boxoffice_lock::memory::MemoryLockCoordinator;
    use boxoffice_realtime::BroadcastHub;
    use chrono::{TimeDelta, Utc};

    fn lapsed_seat(store: &MemoryBookingStore) -> SeatId {
        let event = store.insert_event("Gala");
        let mut seat = store.insert_seat(event.id, "A1");
        seat.status = SeatStatus::Held;
        seat.hold_expiry = Some(Utc::now() - TimeDelta::seconds(5));
        let id = seat.id;
        store.put_seat(seat);
        id
    }

    fn runner(store: &MemoryBookingStore) -> ReaperRunner {
        let reaper = ExpiryReaper::new(
            Arc::new(store.clone()),
            LockManager::from_coordinator(Arc::new(MemoryLockCoordinator::new())),
            Arc::new(BroadcastHub::new(8)),
        );
        ReaperRunner::new(Arc::new(reaper), Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclaims_within_one_interval() {
        let store = MemoryBookingStore::new();
        let seat_id = lapsed_seat(&store);
        let handle = ReaperHandle::spawn(runner(&store));

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            store.find_seat(seat_id).await.unwrap().unwrap().status,
            SeatStatus::Held
        );

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(
            store.find_seat(seat_id).await.unwrap().unwrap().status,
            SeatStatus::Available
        );

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycles_do_not_stop_schedule() {
        let store = MemoryBookingStore::new();
        let seat_id = lapsed_seat(&store);
        store.set_fail_commits(true);
        let handle = ReaperHandle::spawn(runner(&store));

        time::sleep(Duration::from_secs(25)).await;
        assert_eq!(
            store.find_seat(seat_id).await.unwrap().unwrap().status,
            SeatStatus::Held
        );

        store.set_fail_commits(false);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            store.find_seat(seat_id).await.unwrap().unwrap().status,
            SeatStatus::Available
        );

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_runner() {
        let store = MemoryBookingStore::new();
        let handle = ReaperHandle::spawn(runner(&store));
        time::sleep(Duration::from_secs(1)).await;
        handle.stop().await;
    }
}
