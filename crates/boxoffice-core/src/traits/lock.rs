//! Lock coordinator trait for TTL-based seat claims.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A TTL-based mutual-exclusion primitive keyed by an opaque string.
///
/// A live entry is the sole authority for which principal may act on the
/// keyed resource. Entries vanish on their own once the TTL elapses.
/// Two implementations are provided:
/// - Redis-based (`SET NX EX`, shared across server instances)
/// - In-memory (process-local, used in development and tests)
///
/// No method waits for a lock to become free.
#[async_trait]
pub trait LockCoordinator: Send + Sync + std::fmt::Debug + 'static {
    /// Create the entry only if it is absent.
    ///
    /// Returns `true` only when this call created it. An entry already
    /// owned by `owner` yields `false`; use [`acquire`](Self::acquire) for
    /// the idempotent form.
    async fn try_acquire(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool>;

    /// The owner recorded in a live entry.
    async fn current_owner(&self, key: &str) -> AppResult<Option<String>>;

    /// Time left before a live entry expires.
    async fn remaining_ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Delete the entry unconditionally.
    ///
    /// Callers must check [`current_owner`](Self::current_owner) first or
    /// they may drop a claim another principal just acquired.
    async fn release(&self, key: &str) -> AppResult<()>;

    /// Delete the entry only if it is still owned by `owner`.
    async fn release_if_owner(&self, key: &str, owner: &str) -> AppResult<bool>;

    /// Reset a live entry's TTL to `ttl`, only if it is owned by `owner`.
    ///
    /// Returns `false` when the entry is gone or belongs to someone else.
    async fn extend_if_owner(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Idempotent acquisition: `true` if the entry was created now or was
    /// already owned by `owner`.
    async fn acquire(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        if self.try_acquire(key, owner, ttl).await? {
            return Ok(true);
        }
        Ok(self.current_owner(key).await?.as_deref() == Some(owner))
    }

    /// Whether a live entry exists for `key`.
    async fn is_locked(&self, key: &str) -> AppResult<bool> {
        Ok(self.current_owner(key).await?.is_some())
    }
}
