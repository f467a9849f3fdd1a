//! Application state shared across all handlers.

use std::sync::Arc;

use boxoffice_auth::{JwtDecoder, PrincipalResolver};
use boxoffice_core::config::AppConfig;
use boxoffice_database::store::BookingStore;
use boxoffice_lock::LockManager;
use boxoffice_realtime::BroadcastHub;
use boxoffice_service::{BookingService, EventCache, SeatFeedService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Seat record store
    pub store: Arc<dyn BookingStore>,
    /// Seat lock coordinator
    pub locks: LockManager,
    /// Live feed fan-out
    pub hub: Arc<BroadcastHub>,
    /// Bearer token to user resolution
    pub principals: PrincipalResolver,
    /// Hold, confirm, release and cancel protocols
    pub bookings: BookingService,
    /// Seat listings and feed subscriptions
    pub feed: SeatFeedService,
}

impl AppState {
    /// Wires the services on top of a store and a lock coordinator.
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn BookingStore>, locks: LockManager) -> Self {
        let hub = Arc::new(BroadcastHub::new(config.realtime.observer_buffer_size));

        let principals =
            PrincipalResolver::new(JwtDecoder::new(&config.auth), Arc::clone(&store));
        let bookings = BookingService::new(
            Arc::clone(&store),
            locks.clone(),
            Arc::clone(&hub),
            config.booking.clone(),
        );
        let events = EventCache::new(&config.cache, Arc::clone(&store));
        let feed = SeatFeedService::new(Arc::clone(&store), events, Arc::clone(&hub));

        Self {
            config,
            store,
            locks,
            hub,
            principals,
            bookings,
            feed,
        }
    }
}
