//! Per-client-IP rate limiting over the shared KV backend (§4.10, §6).
//!
//! Fixed window counter: `ratelimit:{ip}` increments on each check and
//! expires after `window_seconds`. On KV failure the check fails open —
//! a degraded cache must never become a denial-of-service against the
//! service's own clients.

use crate::backend::KvBackend;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32, reset_at_unix: i64 },
    Denied { retry_after_seconds: u64 },
}

pub struct RateLimiter {
    backend: Arc<dyn KvBackend>,
    limit: u32,
    window_seconds: u64,
}

impl RateLimiter {
    pub fn new(backend: Arc<dyn KvBackend>, limit: u32, window_seconds: u64) -> Self {
        Self {
            backend,
            limit,
            window_seconds,
        }
    }

    pub async fn check(&self, client_ip: &str) -> RateLimitDecision {
        let key = format!("ratelimit:{client_ip}");
        let reset_at: DateTime<Utc> = Utc::now() + Duration::seconds(self.window_seconds as i64);

        match self.backend.incr_with_ttl(&key, self.window_seconds).await {
            Some(count) if count > self.limit as u64 => RateLimitDecision::Denied {
                retry_after_seconds: self.window_seconds,
            },
            Some(count) => RateLimitDecision::Allowed {
                remaining: self.limit.saturating_sub(count as u32),
                reset_at_unix: reset_at.timestamp(),
            },
            // Backend unreachable: fail open.
            None => RateLimitDecision::Allowed {
                remaining: self.limit,
                reset_at_unix: reset_at.timestamp(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DisabledBackend;

    #[tokio::test]
    async fn disabled_backend_always_allows() {
        let limiter = RateLimiter::new(Arc::new(DisabledBackend), 10, 60);
        let decision = limiter.check("127.0.0.1").await;
        assert!(matches!(decision, RateLimitDecision::Allowed { .. }));
    }
}
