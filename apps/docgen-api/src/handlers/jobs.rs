//! `GET /jobs/{id}`, `GET /jobs/{id}/download`.

use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgen_types::model::JobState;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = state.jobs.get(id).await?;
    Ok(Json(json!({
        "job_id": job.id,
        "state": job.state,
        "created_at": job.created_at,
        "finished_at": job.finished_at,
        "error": job.error,
    }))
    .into_response())
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = state.jobs.get(id).await?;

    match job.state {
        JobState::Pending | JobState::Running => {
            // 425-class "still running" — axum's StatusCode lacks a
            // built-in Too Early constant, so construct it directly.
            let status = StatusCode::from_u16(425).expect("425 is a valid HTTP status code");
            Ok((status, Json(json!({ "state": job.state, "message": "job is still running" }))).into_response())
        }
        JobState::Failed => Err(docgen_jobs::JobsError::ArtifactMissing(id).into()),
        JobState::Cancelled => Err(docgen_jobs::JobsError::NotFound(id).into()),
        JobState::Success => {
            let artifact = state.jobs.get_artifact(id).await?;
            let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
            Ok((
                [
                    (header::CONTENT_TYPE, artifact.format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                    (HeaderName::from_static("x-cache"), "MISS".to_string()),
                ],
                artifact.bytes,
            )
                .into_response())
        }
    }
}
