//! Seat listings and live feed subscriptions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::EventId;
use boxoffice_database::store::BookingStore;
use boxoffice_realtime::{BroadcastHub, ObserverHandle, ObserverId, OutboundMessage, SeatSnapshot};

use super::cache::EventCache;

/// Every seat of an event with its status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSeats {
    /// Event ID.
    pub event_id: EventId,
    /// Seats ordered by ID.
    pub seats: Vec<SeatSnapshot>,
}

/// A registered live feed observer.
///
/// The first frame on `receiver` is the event snapshot. Call
/// [`SeatFeedService::unsubscribe`] when the observer goes away.
#[derive(Debug)]
pub struct FeedSubscription {
    /// Event being observed.
    pub event_id: EventId,
    /// Observer ID in the hub.
    pub observer_id: ObserverId,
    /// Frames for the observer.
    pub receiver: mpsc::Receiver<OutboundMessage>,
}

/// Serves seat listings and live feed subscriptions.
#[derive(Debug, Clone)]
pub struct SeatFeedService {
    /// Record store.
    store: Arc<dyn BookingStore>,
    /// Event metadata.
    events: EventCache,
    /// Live feed fan-out.
    hub: Arc<BroadcastHub>,
}

impl SeatFeedService {
    /// Creates a new feed service.
    pub fn new(store: Arc<dyn BookingStore>, events: EventCache, hub: Arc<BroadcastHub>) -> Self {
        Self { store, events, hub }
    }

    /// Every seat of an event, ordered by ID.
    pub async fn event_seats(&self, event_id: EventId) -> AppResult<EventSeats> {
        self.events
            .get(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        let seats = self.store.seats_for_event(event_id).await?;
        Ok(EventSeats {
            event_id,
            seats: seats.iter().map(SeatSnapshot::from).collect(),
        })
    }

    /// Register a new observer of an event's seats.
    pub async fn subscribe(&self, event_id: EventId) -> AppResult<FeedSubscription> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        let (handle, receiver) = ObserverHandle::channel(self.hub.buffer_size());
        let observer_id = handle.id;
        let store = Arc::clone(&self.store);

        self.hub
            .subscribe(event_id, Arc::new(handle), async move {
                let seats = store.seats_for_event(event_id).await?;
                Ok(OutboundMessage::initial(&event, &seats))
            })
            .await?;

        info!(%event_id, %observer_id, "Feed observer subscribed");
        Ok(FeedSubscription {
            event_id,
            observer_id,
            receiver,
        })
    }

    /// Remove an observer.
    pub fn unsubscribe(&self, event_id: EventId, observer_id: ObserverId) {
        self.hub.unsubscribe(event_id, observer_id);
        info!(%event_id, %observer_id, "Feed observer unsubscribed");
    }
}
