//! Event metadata cache backed by moka.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use boxoffice_core::config::CacheConfig;
use boxoffice_core::result::AppResult;
use boxoffice_core::types::id::EventId;
use boxoffice_database::store::BookingStore;
use boxoffice_entity::event::Event;

/// Read-through cache of event rows. Misses are not cached.
#[derive(Debug, Clone)]
pub struct EventCache {
    /// The underlying moka cache.
    cache: Cache<EventId, Event>,
    /// Fallback for misses.
    store: Arc<dyn BookingStore>,
}

impl EventCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig, store: Arc<dyn BookingStore>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.event_max_capacity)
            .time_to_live(Duration::from_secs(config.event_ttl_seconds))
            .build();
        Self { cache, store }
    }

    /// Look an event up, consulting the store on a miss.
    pub async fn get(&self, event_id: EventId) -> AppResult<Option<Event>> {
        if let Some(event) = self.cache.get(&event_id).await {
            return Ok(Some(event));
        }

        let event = self.store.find_event(event_id).await?;
        if let Some(event) = &event {
            debug!(%event_id, "Caching event metadata");
            self.cache.insert(event_id, event.clone()).await;
        }
        Ok(event)
    }
}
