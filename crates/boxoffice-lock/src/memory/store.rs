//! Process-local lock entries with lazy expiry.
//!
//! Expiry is measured on the tokio clock so tests can move time with
//! `tokio::time::pause` and `advance`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::trace;

use boxoffice_core::error::AppError;
use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;

#[derive(Debug, Clone)]
struct LockEntry {
    owner: String,
    expires_at: Instant,
}

impl LockEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Lock coordinator backed by a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockCoordinator {
    entries: Arc<DashMap<String, LockEntry>>,
}

impl MemoryLockCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries still stored, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live_entry(&self, key: &str) -> Option<LockEntry> {
        let now = Instant::now();
        let entry = self.entries.get(key).map(|e| e.value().clone())?;
        if entry.is_live(now) {
            return Some(entry);
        }
        self.entries.remove_if(key, |_, e| !e.is_live(now));
        None
    }
}

#[async_trait]
impl LockCoordinator for MemoryLockCoordinator {
    async fn try_acquire(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        if ttl.is_zero() {
            return Err(AppError::lock("Lock TTL must be greater than zero"));
        }
        let now = Instant::now();
        let fresh = LockEntry {
            owner: owner.to_string(),
            expires_at: now + ttl,
        };

        let acquired = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    false
                } else {
                    occupied.insert(fresh);
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                true
            }
        };

        trace!(key, owner, acquired, "Memory lock acquire");
        Ok(acquired)
    }

    async fn current_owner(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).map(|e| e.owner))
    }

    async fn remaining_ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .live_entry(key)
            .map(|e| e.expires_at.saturating_duration_since(now)))
    }

    async fn release(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn release_if_owner(&self, key: &str, owner: &str) -> AppResult<bool> {
        let now = Instant::now();
        let removed = self
            .entries
            .remove_if(key, |_, e| e.owner == owner && e.is_live(now));
        Ok(removed.is_some())
    }

    async fn extend_if_owner(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        if ttl.is_zero() {
            return Err(AppError::lock("Lock TTL must be greater than zero"));
        }
        let now = Instant::now();
        let extended = match self.entries.get_mut(key) {
            Some(mut entry) if entry.owner == owner && entry.is_live(now) => {
                entry.expires_at = now + ttl;
                true
            }
            _ => false,
        };
        trace!(key, owner, extended, "Memory lock extend");
        Ok(extended)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
