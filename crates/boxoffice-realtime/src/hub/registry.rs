//! Per-event observer registry and fan-out.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::EventId;

use super::observer::{ObserverHandle, ObserverId};
use crate::message::OutboundMessage;

/// Registry of live observers, grouped by event.
///
/// Events with no observers have no entry.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    /// Event ID → observers of that event.
    events: DashMap<EventId, HashMap<ObserverId, Arc<ObserverHandle>>>,
    /// Outbound buffer size for new observers.
    buffer_size: usize,
}

impl BroadcastHub {
    /// Creates a hub whose observers buffer up to `buffer_size` frames.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            events: DashMap::new(),
            buffer_size,
        }
    }

    /// Outbound buffer size for observers created by callers.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Registers an observer and delivers it a snapshot first.
    ///
    /// The observer is registered before `snapshot` is evaluated, and any
    /// push published meanwhile is held back until the snapshot is out, so
    /// no change between the snapshot read and the first push is lost.
    pub async fn subscribe<F>(
        &self,
        event_id: EventId,
        observer: Arc<ObserverHandle>,
        snapshot: F,
    ) -> AppResult<()>
    where
        F: Future<Output = AppResult<OutboundMessage>>,
    {
        let observer_id = observer.id;
        self.events
            .entry(event_id)
            .or_default()
            .insert(observer_id, Arc::clone(&observer));

        let snapshot = match snapshot.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.unsubscribe(event_id, observer_id);
                return Err(e);
            }
        };

        if !observer.prime(snapshot) {
            debug!(%event_id, %observer_id, "Observer gone before snapshot");
            self.unsubscribe(event_id, observer_id);
        }
        Ok(())
    }

    /// Removes an observer. Drops the event's entry once it is empty.
    pub fn unsubscribe(&self, event_id: EventId, observer_id: ObserverId) {
        if let Some(mut observers) = self.events.get_mut(&event_id) {
            observers.remove(&observer_id);
        }
        self.events
            .remove_if(&event_id, |_, observers| observers.is_empty());
    }

    /// Delivers `message` to every observer of `event_id`.
    ///
    /// Observers that fail to take the frame are dropped; the rest still
    /// receive it. Returns the number of successful deliveries.
    pub fn publish(&self, event_id: EventId, message: &OutboundMessage) -> usize {
        let observers: Vec<Arc<ObserverHandle>> = match self.events.get(&event_id) {
            Some(observers) => observers.values().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for observer in observers {
            if observer.send(message.clone()) {
                delivered += 1;
            } else {
                warn!(%event_id, observer_id = %observer.id, "Dropping observer after failed delivery");
                self.unsubscribe(event_id, observer.id);
            }
        }
        delivered
    }

    /// Number of observers currently registered for an event.
    pub fn observer_count(&self, event_id: EventId) -> usize {
        self.events
            .get(&event_id)
            .map(|observers| observers.len())
            .unwrap_or(0)
    }

    /// Number of events with at least one observer.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::error::AppError;
    use boxoffice_core::types::id::SeatId;
    use boxoffice_entity::seat::SeatStatus;

    const EVENT: EventId = EventId::new(7);

    fn snapshot() -> OutboundMessage {
        OutboundMessage::Initial {
            event_id: EVENT,
            event_name: "Gala".into(),
            seats: Vec::new(),
        }
    }

    fn update(seat: i64) -> OutboundMessage {
        OutboundMessage::SeatUpdate {
            seat_id: SeatId::new(seat),
            seat_number: format!("A{seat}"),
            status: SeatStatus::Held,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_subscribe_delivers_snapshot_then_pushes() {
        let hub = BroadcastHub::new(8);
        let (handle, mut rx) = ObserverHandle::channel(hub.buffer_size());
        hub.subscribe(EVENT, Arc::new(handle), async { Ok(snapshot()) })
            .await
            .unwrap();

        assert_eq!(hub.publish(EVENT, &update(1)), 1);
        assert_eq!(rx.recv().await, Some(snapshot()));
        assert_eq!(rx.recv().await, Some(update(1)));
    }

    #[tokio::test]
    async fn test_push_during_snapshot_load_arrives_after_snapshot() {
        let hub = Arc::new(BroadcastHub::new(8));
        let (handle, mut rx) = ObserverHandle::channel(8);

        let publisher = Arc::clone(&hub);
        hub.subscribe(EVENT, Arc::new(handle), async move {
            assert_eq!(publisher.publish(EVENT, &update(2)), 1);
            Ok(snapshot())
        })
        .await
        .unwrap();

        assert_eq!(rx.recv().await, Some(snapshot()));
        assert_eq!(rx.recv().await, Some(update(2)));
    }

    #[tokio::test]
    async fn test_failed_snapshot_unregisters() {
        let hub = BroadcastHub::new(8);
        let (handle, _rx) = ObserverHandle::channel(8);
        let result = hub
            .subscribe(EVENT, Arc::new(handle), async {
                Err(AppError::not_found("Event not found"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(hub.event_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_empty_event() {
        let hub = BroadcastHub::new(8);
        let (a, _rx_a) = ObserverHandle::channel(8);
        let (b, _rx_b) = ObserverHandle::channel(8);
        let (a_id, b_id) = (a.id, b.id);
        hub.subscribe(EVENT, Arc::new(a), async { Ok(snapshot()) })
            .await
            .unwrap();
        hub.subscribe(EVENT, Arc::new(b), async { Ok(snapshot()) })
            .await
            .unwrap();
        assert_eq!(hub.observer_count(EVENT), 2);

        hub.unsubscribe(EVENT, a_id);
        assert_eq!(hub.observer_count(EVENT), 1);
        hub.unsubscribe(EVENT, b_id);
        assert_eq!(hub.event_count(), 0);
    }

    #[tokio::test]
    async fn test_dead_observer_dropped_without_affecting_others() {
        let hub = BroadcastHub::new(8);
        let (live, mut live_rx) = ObserverHandle::channel(8);
        let (dead, dead_rx) = ObserverHandle::channel(8);
        hub.subscribe(EVENT, Arc::new(live), async { Ok(snapshot()) })
            .await
            .unwrap();
        hub.subscribe(EVENT, Arc::new(dead), async { Ok(snapshot()) })
            .await
            .unwrap();
        drop(dead_rx);

        assert_eq!(hub.publish(EVENT, &update(3)), 1);
        assert_eq!(hub.observer_count(EVENT), 1);
        assert_eq!(live_rx.recv().await, Some(snapshot()));
        assert_eq!(live_rx.recv().await, Some(update(3)));
    }

    #[tokio::test]
    async fn test_publish_to_unwatched_event() {
        let hub = BroadcastHub::new(8);
        assert_eq!(hub.publish(EventId::new(99), &update(1)), 0);
    }
}
