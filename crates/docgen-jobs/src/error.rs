use docgen_types::error::{ApiError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum JobsError {
    #[error("job queue is full")]
    QueueFull,

    #[error("job {0} not found")]
    NotFound(uuid::Uuid),

    #[error("job {0} has no stored artifact")]
    ArtifactMissing(uuid::Uuid),
}

impl JobsError {
    pub fn into_api_error(self) -> ApiError {
        match self {
            JobsError::QueueFull => ApiError::new(
                ErrorCode::Api006ServiceUnavailable,
                "Job queue is full",
                "the render worker pool is saturated; retry shortly",
            )
            .with_suggested_fix("retry after a short backoff, or submit via the synchronous /generate endpoint"),
            JobsError::NotFound(id) => ApiError::new(
                ErrorCode::Api004ResourceNotFound,
                "Job not found",
                format!("no job with id {id}"),
            ),
            JobsError::ArtifactMissing(id) => ApiError::new(
                ErrorCode::Api004ResourceNotFound,
                "Job artifact not found",
                format!("job {id} has no downloadable artifact (not yet finished, or expired)"),
            ),
        }
    }
}
