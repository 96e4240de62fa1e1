//! `POST /generate`, `POST /generate-yaml`, `POST /generate/async`.

use axum::extract::State;
use axum::http::{header, HeaderName};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgen_types::model::DocumentRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::state::AppState;

async fn render_and_respond(
    state: &AppState,
    request: DocumentRequest,
) -> Result<Response, AppError> {
    let deadline = Duration::from_secs(state.config.request_timeout_seconds);
    let artifact = tokio::time::timeout(deadline, state.orchestrator.render(request))
        .await
        .map_err(|_| AppError::Timeout(state.config.request_timeout_seconds))??;

    if artifact.bytes.len() as u64 > state.config.max_pdf_size_bytes {
        return Err(AppError::ResponseTooLarge(state.config.max_pdf_size_bytes));
    }

    let content_type = artifact.format.content_type();
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (
                HeaderName::from_static("x-cache"),
                artifact.cache_status.header_value().to_string(),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    render_and_respond(&state, request).await
}

/// Same contract as `/generate`, but `data` arrives as a YAML string
/// rather than inline JSON, parsed with `serde_yaml`'s safe loader.
#[derive(Debug, serde::Deserialize)]
pub struct GenerateYamlRequest {
    pub document_type: docgen_types::model::DocumentType,
    pub template: String,
    #[serde(default)]
    pub format: docgen_types::model::Format,
    pub data: String,
    #[serde(default)]
    pub ultra_validation: bool,
    #[serde(default)]
    pub spacing_mode: Option<docgen_types::model::SpacingMode>,
}

pub async fn generate_yaml(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateYamlRequest>,
) -> Result<Response, AppError> {
    let data: Value = serde_yaml::from_str(&request.data)
        .map_err(|e| AppError::MalformedYaml(e.to_string()))?;

    let document_request = DocumentRequest {
        document_type: request.document_type,
        template: request.template,
        format: request.format,
        data,
        ultra_validation: request.ultra_validation,
        spacing_mode: request.spacing_mode,
    };

    render_and_respond(&state, document_request).await
}

pub async fn generate_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let job_id = state.jobs.submit(request).await?;
    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(json!({ "job_id": job_id, "state": "pending" })),
    )
        .into_response())
}
