//! `SET NX EX` lock entries in Redis.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;

use super::client::RedisClient;

/// Delete the key only while it still holds the caller's owner value.
///
/// KEYS[1] = lock key
/// ARGV[1] = owner
///
/// Returns 1 if deleted, 0 otherwise.
const RELEASE_IF_OWNER_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    end
    return 0
"#;

/// Reset the key's TTL only while it still holds the caller's owner value.
///
/// KEYS[1] = lock key
/// ARGV[1] = owner
/// ARGV[2] = ttl in seconds
///
/// Returns 1 if the TTL was set, 0 otherwise.
const EXTEND_IF_OWNER_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('EXPIRE', KEYS[1], ARGV[2])
    end
    return 0
"#;

/// Lock coordinator shared by every server instance through Redis.
#[derive(Debug, Clone)]
pub struct RedisLockCoordinator {
    client: RedisClient,
}

impl RedisLockCoordinator {
    /// Create a new coordinator over a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Lock, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LockCoordinator for RedisLockCoordinator {
    async fn try_acquire(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        if ttl.is_zero() {
            return Err(AppError::lock("Lock TTL must be greater than zero"));
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        let result: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(owner)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        let acquired = result.is_some();
        debug!(key = %full_key, owner, acquired, "Redis lock acquire");
        Ok(acquired)
    }

    async fn current_owner(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let owner: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(owner)
    }

    async fn remaining_ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        // -2: no such key, -1: no expiry set.
        let ttl: i64 = conn.ttl(&full_key).await.map_err(Self::map_err)?;
        Ok(u64::try_from(ttl).ok().map(Duration::from_secs))
    }

    async fn release(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn release_if_owner(&self, key: &str, owner: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: i64 = redis::Script::new(RELEASE_IF_OWNER_SCRIPT)
            .key(&full_key)
            .arg(owner)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(removed == 1)
    }

    async fn extend_if_owner(&self, key: &str, owner: &str, ttl: Duration) -> AppResult<bool> {
        if ttl.is_zero() {
            return Err(AppError::lock("Lock TTL must be greater than zero"));
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let extended: i64 = redis::Script::new(EXTEND_IF_OWNER_SCRIPT)
            .key(&full_key)
            .arg(owner)
            .arg(ttl.as_secs().max(1))
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        debug!(key = %full_key, owner, extended = extended == 1, "Redis lock extend");
        Ok(extended == 1)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
