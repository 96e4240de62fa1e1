//! Content-addressed render cache and rate-limit bucket store (C7, §4.7).
//!
//! Wraps a [`backend::KvBackend`] with the cache's actual public
//! contract: derive a key from request shape, look up rendered bytes,
//! store them with a format-specific TTL. DOCX output is never cached
//! (§9 open question — decided in DESIGN.md: DOCX generation is cheap
//! and side-channel, not worth a cache slot).

pub mod backend;
pub mod keys;
pub mod ratelimit;

use backend::KvBackend;
use docgen_types::model::{DocumentType, Format};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fallback TTLs used when a caller doesn't have its own configuration
/// (e.g. in tests). Production wiring passes §6's `PDF_CACHE_TTL` /
/// `TYPST_CACHE_TTL` values through [`DocumentCache::new`].
pub const DEFAULT_PDF_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_TYPST_TTL_SECONDS: u64 = 43_200;

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
}

pub struct DocumentCache {
    backend: Arc<dyn KvBackend>,
    metrics: CacheMetrics,
    pdf_ttl_seconds: u64,
    typst_ttl_seconds: u64,
}

impl DocumentCache {
    pub fn new(backend: Arc<dyn KvBackend>, pdf_ttl_seconds: u64, typst_ttl_seconds: u64) -> Self {
        Self {
            backend,
            metrics: CacheMetrics::default(),
            pdf_ttl_seconds,
            typst_ttl_seconds,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.metrics.hits.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
        }
    }

    /// Look up a cached render for a cacheable format (pdf/typst). Always
    /// misses for `Format::Docx`.
    pub async fn get(
        &self,
        document_type: DocumentType,
        template: &str,
        data: &Value,
        format: Format,
    ) -> Option<Vec<u8>> {
        if format == Format::Docx {
            return None;
        }
        let key = keys::derive_key(document_type, template, data, format);
        let hit = self.backend.get(&key).await;
        if hit.is_some() {
            self.metrics.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.misses.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    pub async fn set(
        &self,
        document_type: DocumentType,
        template: &str,
        data: &Value,
        format: Format,
        bytes: Vec<u8>,
    ) {
        if format == Format::Docx {
            return;
        }
        let key = keys::derive_key(document_type, template, data, format);
        let ttl = match format {
            Format::Pdf => self.pdf_ttl_seconds,
            Format::Typst => self.typst_ttl_seconds,
            Format::Docx => return,
        };
        self.backend.set(&key, bytes, ttl).await;
    }

    /// Evict every cached format for a given `(document_type, template,
    /// data)` triple, e.g. after a template's source has changed.
    pub async fn invalidate(&self, document_type: DocumentType, template: &str, data: &Value) {
        for format in [Format::Pdf, Format::Typst] {
            let key = keys::derive_key(document_type, template, data, format);
            self.backend.del(&key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::DisabledBackend;
    use serde_json::json;

    #[tokio::test]
    async fn disabled_backend_is_always_a_miss() {
        let cache = DocumentCache::new(
            Arc::new(DisabledBackend),
            DEFAULT_PDF_TTL_SECONDS,
            DEFAULT_TYPST_TTL_SECONDS,
        );
        let data = json!({"personalInfo": {"name": "A"}});
        assert!(cache
            .get(DocumentType::Resume, "classic", &data, Format::Pdf)
            .await
            .is_none());
        let snap = cache.metrics();
        assert_eq!(snap.misses, 1);
    }

    #[tokio::test]
    async fn docx_format_is_never_cached() {
        let cache = DocumentCache::new(
            Arc::new(DisabledBackend),
            DEFAULT_PDF_TTL_SECONDS,
            DEFAULT_TYPST_TTL_SECONDS,
        );
        let data = json!({});
        cache
            .set(DocumentType::Resume, "classic", &data, Format::Docx, vec![1, 2, 3])
            .await;
        assert!(cache
            .get(DocumentType::Resume, "classic", &data, Format::Docx)
            .await
            .is_none());
    }
}
