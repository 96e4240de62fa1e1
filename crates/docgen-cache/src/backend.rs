//! Pluggable key-value backend.
//!
//! Grounded on the storage-backend trait pattern from the CacheBolt
//! example in the retrieval pack: a small async trait the cache and
//! rate-limiter both build on, with a Redis implementation and a
//! disabled implementation that always misses. Connection failures at
//! startup or mid-flight degrade a `RedisBackend` to disabled rather
//! than propagating — caching is an optimization, not a dependency the
//! request path should die on.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Per-operation bound (§4.7): a hung Redis connection must degrade to
/// a miss/no-op within this window rather than stalling the request
/// path up to the full request deadline.
const OPERATION_TIMEOUT: Duration = Duration::from_millis(250);

/// Atomic counter-and-expiry increment for rate-limit windows. Returns
/// the post-increment count, or `None` if the backend can't serve it.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64);
    async fn del(&self, key: &str);
    async fn incr_with_ttl(&self, key: &str, ttl_seconds: u64) -> Option<u64>;
    fn is_connected(&self) -> bool;
}

pub struct RedisBackend {
    manager: ConnectionManager,
    connected: AtomicBool,
}

impl RedisBackend {
    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self {
            manager,
            connected: AtomicBool::new(true),
        })
    }

    fn mark_down(&self, err: &redis::RedisError) {
        warn!(error = %err, "redis backend degraded to disabled mode");
        self.connected.store(false, Ordering::Relaxed);
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = self.manager.clone();
        let op = redis::cmd("GET").arg(key).query_async(&mut conn);
        match tokio::time::timeout(OPERATION_TIMEOUT, op).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                self.mark_down(&e);
                None
            }
            Err(_) => {
                warn!(key, "redis GET timed out, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) {
        let mut conn = self.manager.clone();
        let op = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<()>(&mut conn);
        match tokio::time::timeout(OPERATION_TIMEOUT, op).await {
            Ok(Err(e)) => self.mark_down(&e),
            Err(_) => warn!(key, "redis SET timed out, treating as failed store"),
            Ok(Ok(())) => {}
        }
    }

    async fn del(&self, key: &str) {
        let mut conn = self.manager.clone();
        let op = redis::cmd("DEL").arg(key).query_async::<()>(&mut conn);
        match tokio::time::timeout(OPERATION_TIMEOUT, op).await {
            Ok(Err(e)) => self.mark_down(&e),
            Err(_) => warn!(key, "redis DEL timed out"),
            Ok(Ok(())) => {}
        }
    }

    async fn incr_with_ttl(&self, key: &str, ttl_seconds: u64) -> Option<u64> {
        let mut conn = self.manager.clone();
        let incr = redis::cmd("INCR").arg(key).query_async::<u64>(&mut conn);
        let count = match tokio::time::timeout(OPERATION_TIMEOUT, incr).await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                self.mark_down(&e);
                return None;
            }
            Err(_) => {
                warn!(key, "redis INCR timed out, failing open");
                return None;
            }
        };

        if count == 1 {
            let expire = redis::cmd("EXPIRE")
                .arg(key)
                .arg(ttl_seconds)
                .query_async::<()>(&mut conn);
            if tokio::time::timeout(OPERATION_TIMEOUT, expire).await.is_err() {
                warn!(key, "redis EXPIRE timed out after INCR");
            }
        }
        Some(count)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Always misses. Used when `REDIS_URL` is unset or the initial
/// connection attempt fails — the service still serves requests, just
/// without caching or distributed rate-limiting.
pub struct DisabledBackend;

#[async_trait]
impl KvBackend for DisabledBackend {
    async fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) {}

    async fn del(&self, _key: &str) {}

    async fn incr_with_ttl(&self, _key: &str, _ttl_seconds: u64) -> Option<u64> {
        None
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// Connect to `url`, falling back to [`DisabledBackend`] on failure so
/// startup never blocks on an absent cache.
pub async fn connect_or_disabled(url: Option<&str>) -> Arc<dyn KvBackend> {
    match url {
        Some(url) => match RedisBackend::connect(url).await {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                warn!(error = %e, "could not connect to redis at startup, caching disabled");
                Arc::new(DisabledBackend)
            }
        },
        None => Arc::new(DisabledBackend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_backend_always_misses() {
        let backend = DisabledBackend;
        assert!(backend.get("any").await.is_none());
        assert!(!backend.is_connected());
        assert!(backend.incr_with_ttl("any", 60).await.is_none());
    }
}
