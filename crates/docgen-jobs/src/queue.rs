//! Bounded worker pool (§4.9): a fixed number of tasks pull jobs off an
//! `mpsc` channel whose capacity bounds in-flight concurrency. A full
//! channel means the pool is saturated — submission fails fast with
//! `JobsError::QueueFull` (503) rather than growing memory unbounded.

use crate::error::JobsError;
use crate::store::{JobStore, StoredArtifact};
use chrono::Utc;
use docgen_types::model::{DocumentRequest, Job, JobState};
use docgen_orchestrator::Orchestrator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_WORKERS: usize = 32;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

pub struct JobQueue {
    sender: mpsc::Sender<Job>,
    store: Arc<JobStore>,
}

impl JobQueue {
    /// Spawn `num_workers` tasks draining a channel of capacity
    /// `queue_capacity`, each running jobs through `orchestrator`.
    pub fn spawn(
        num_workers: usize,
        queue_capacity: usize,
        orchestrator: Arc<Orchestrator>,
        store: Arc<JobStore>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>(queue_capacity);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        for worker_id in 0..num_workers {
            let receiver = receiver.clone();
            let orchestrator = orchestrator.clone();
            let store = store.clone();
            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut receiver = receiver.lock().await;
                        receiver.recv().await
                    };
                    let Some(job) = job else {
                        info!(worker_id, "job channel closed, worker exiting");
                        break;
                    };
                    run_job(job, &orchestrator, &store).await;
                }
            });
        }

        Self { sender, store }
    }

    /// Enqueue `request` as a new job, returning its id immediately.
    /// Fails with `QueueFull` if every worker is busy and the channel
    /// has no free capacity.
    pub async fn submit(&self, request: DocumentRequest) -> Result<Uuid, JobsError> {
        let job = Job::new(request);
        self.store.put(&job, None).await;

        match self.sender.try_send(job.clone()) {
            Ok(()) => Ok(job.id),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(job_id = %job.id, "job queue full, rejecting submission");
                Err(JobsError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(JobsError::QueueFull),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Job, JobsError> {
        self.store.get(id).await.ok_or(JobsError::NotFound(id))
    }

    pub async fn get_artifact(&self, id: Uuid) -> Result<StoredArtifact, JobsError> {
        self.store
            .get_artifact(id)
            .await
            .ok_or(JobsError::ArtifactMissing(id))
    }
}

async fn run_job(mut job: Job, orchestrator: &Orchestrator, store: &JobStore) {
    job.state = JobState::Running;
    store.put(&job, None).await;

    match orchestrator.render(job.request.clone()).await {
        Ok(artifact) => {
            store
                .put_artifact(
                    job.id,
                    StoredArtifact {
                        filename: artifact.filename,
                        format: artifact.format,
                        bytes: artifact.bytes,
                    },
                )
                .await;
            job.state = JobState::Success;
            job.result_ref = Some(format!("job-artifact:{}", job.id));
        }
        Err(e) => {
            job.state = JobState::Failed;
            job.error = Some(e.into_api_error());
        }
    }
    job.finished_at = Some(Utc::now());
    store.put(&job, Some(crate::store::TERMINAL_TTL_SECONDS)).await;
}
