//! Job records and their result artifacts, persisted to the shared KV
//! backend under `job:{uuid}` / `job-artifact:{uuid}` (§6).

use docgen_cache::backend::KvBackend;
use docgen_types::model::{Format, Job};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Terminal job records are reaped after this TTL; they're no longer
/// useful once a client has had a fair window to poll the result.
pub const TERMINAL_TTL_SECONDS: u64 = 3600;

/// Safety-net TTL for pending/running records, in case a worker crashes
/// mid-job and never writes a terminal state. Far longer than any job
/// should realistically take.
const PENDING_TTL_SECONDS: u64 = 7 * 24 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub filename: String,
    pub format: Format,
    pub bytes: Vec<u8>,
}

pub struct JobStore {
    backend: Arc<dyn KvBackend>,
}

impl JobStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    fn job_key(id: Uuid) -> String {
        format!("job:{id}")
    }

    fn artifact_key(id: Uuid) -> String {
        format!("job-artifact:{id}")
    }

    /// Persist `job`. Pending/running records have no TTL (reaped only
    /// once they reach a terminal state); pass `ttl_seconds` to bound
    /// terminal records.
    pub async fn put(&self, job: &Job, ttl_seconds: Option<u64>) {
        let bytes = serde_json::to_vec(job).expect("Job always serializes");
        self.backend
            .set(&Self::job_key(job.id), bytes, ttl_seconds.unwrap_or(PENDING_TTL_SECONDS))
            .await;
    }

    pub async fn get(&self, id: Uuid) -> Option<Job> {
        let bytes = self.backend.get(&Self::job_key(id)).await?;
        serde_json::from_slice(&bytes).ok()
    }

    pub async fn put_artifact(&self, id: Uuid, artifact: StoredArtifact) {
        let bytes = serde_json::to_vec(&artifact).expect("StoredArtifact always serializes");
        self.backend
            .set(&Self::artifact_key(id), bytes, TERMINAL_TTL_SECONDS)
            .await;
    }

    pub async fn get_artifact(&self, id: Uuid) -> Option<StoredArtifact> {
        let bytes = self.backend.get(&Self::artifact_key(id)).await?;
        serde_json::from_slice(&bytes).ok()
    }
}
