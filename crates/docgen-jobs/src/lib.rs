//! Async job queue (C9): wraps the orchestrator's synchronous pipeline
//! in a bounded worker pool so `/generate/async` can return immediately
//! with a job id while rendering continues in the background.

pub mod error;
pub mod queue;
pub mod store;

pub use error::JobsError;
pub use queue::{JobQueue, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
pub use store::{JobStore, StoredArtifact};

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_cache::backend::DisabledBackend;
    use docgen_cache::DocumentCache;
    use docgen_orchestrator::Orchestrator;
    use docgen_types::model::{DocumentRequest, DocumentType, Format, JobState};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn sample_request() -> DocumentRequest {
        DocumentRequest {
            document_type: DocumentType::Resume,
            template: "classic".to_string(),
            format: Format::Typst,
            data: json!({
                "personalInfo": {"name": "Grace Hopper", "email": "grace@example.com"},
            }),
            ultra_validation: false,
            spacing_mode: None,
        }
    }

    #[tokio::test]
    async fn submitted_job_eventually_succeeds() {
        let backend = Arc::new(DisabledBackend);
        let cache = Arc::new(DocumentCache::new(backend.clone(), docgen_cache::DEFAULT_PDF_TTL_SECONDS, docgen_cache::DEFAULT_TYPST_TTL_SECONDS));
        let orchestrator = Arc::new(Orchestrator::new(cache));
        let store = Arc::new(JobStore::new(backend));
        let queue = JobQueue::spawn(2, 8, orchestrator, store);

        let id = queue.submit(sample_request()).await.unwrap();

        let mut job = queue.get(id).await.unwrap();
        for _ in 0..50 {
            if job.state != JobState::Pending && job.state != JobState::Running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            job = queue.get(id).await.unwrap();
        }

        assert_eq!(job.state, JobState::Success);
        let artifact = queue.get_artifact(id).await.unwrap();
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn unknown_job_id_is_not_found() {
        let backend = Arc::new(DisabledBackend);
        let cache = Arc::new(DocumentCache::new(backend.clone(), docgen_cache::DEFAULT_PDF_TTL_SECONDS, docgen_cache::DEFAULT_TYPST_TTL_SECONDS));
        let orchestrator = Arc::new(Orchestrator::new(cache));
        let store = Arc::new(JobStore::new(backend));
        let queue = JobQueue::spawn(1, 4, orchestrator, store);

        let err = queue.get(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, JobsError::NotFound(_)));
    }
}
