//! Shared application state, built once at startup and handed to every
//! handler behind an `Arc`.

use crate::config::Config;
use docgen_cache::ratelimit::RateLimiter;
use docgen_cache::{backend, DocumentCache};
use docgen_jobs::{JobQueue, JobStore};
use docgen_orchestrator::Orchestrator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub config: Config,
    pub cache: Arc<DocumentCache>,
    pub orchestrator: Arc<Orchestrator>,
    pub jobs: Arc<JobQueue>,
    pub rate_limiter: Arc<RateLimiter>,
    compiler_ready: AtomicBool,
}

impl AppState {
    pub async fn new(config: Config) -> Self {
        let backend = backend::connect_or_disabled(config.redis_url().as_deref()).await;
        let cache = Arc::new(DocumentCache::new(
            backend.clone(),
            config.pdf_cache_ttl,
            config.typst_cache_ttl,
        ));
        let orchestrator = Arc::new(Orchestrator::new(cache.clone()));
        let store = Arc::new(JobStore::new(backend.clone()));
        let jobs = Arc::new(JobQueue::spawn(
            config.job_workers,
            config.job_queue_capacity,
            orchestrator.clone(),
            store,
        ));
        // The enforced cap is the burst allowance, not the steady-state
        // per-minute rate: property 7 requires the 21st request within
        // the window to be denied, which only holds if `limit` is
        // `rate_limit_burst` (default 20), not `rate_limit_per_minute`
        // (default 60).
        let rate_limiter = Arc::new(RateLimiter::new(
            backend,
            config.rate_limit_burst,
            60,
        ));

        info!(
            job_workers = config.job_workers,
            cache_enabled = config.cache_enabled,
            "application state initialized"
        );

        Self {
            config,
            cache,
            orchestrator,
            jobs,
            rate_limiter,
            compiler_ready: AtomicBool::new(false),
        }
    }

    /// Run a trivial compile at startup so `/health` can report whether
    /// the Typst compiler initialized successfully, without blocking
    /// server startup on it.
    pub async fn warm_up_compiler(&self) {
        match docgen_orchestrator::compile_pdf("Warming up.".to_string()).await {
            Ok(_) => {
                self.compiler_ready.store(true, Ordering::Relaxed);
                info!("typst compiler warmed up successfully");
            }
            Err(e) => {
                warn!(error = %e, "typst compiler warm-up failed; will retry lazily on first request");
            }
        }
    }

    pub fn compiler_ready(&self) -> bool {
        self.compiler_ready.load(Ordering::Relaxed)
    }

    pub fn mark_compiler_ready(&self) {
        self.compiler_ready.store(true, Ordering::Relaxed);
    }
}
