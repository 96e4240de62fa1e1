//! Bridges every crate's error type into the wire error shape of §6/§7.
//! This is the only place in the workspace that serializes an
//! [`ApiError`] onto the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgen_types::error::{ApiError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Orchestrator(#[from] docgen_orchestrator::OrchestratorError),

    #[error(transparent)]
    Validation(#[from] docgen_validate::ValidationError),

    #[error(transparent)]
    Template(#[from] docgen_templates::TemplateError),

    #[error(transparent)]
    Docx(#[from] docgen_docx::DocxError),

    #[error(transparent)]
    Jobs(#[from] docgen_jobs::JobsError),

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("malformed JSON request body: {0}")]
    MalformedJson(String),

    #[error("malformed YAML payload: {0}")]
    MalformedYaml(String),

    #[error("rendered artifact exceeds the {0}-byte size ceiling")]
    ResponseTooLarge(u64),

    #[error("request exceeded its {0}s deadline")]
    Timeout(u64),
}

impl AppError {
    fn into_api_error(self) -> ApiError {
        match self {
            AppError::Orchestrator(e) => e.into_api_error(),
            AppError::Validation(e) => e.into_api_error(),
            AppError::Template(e) => e.into_api_error(),
            AppError::Jobs(e) => e.into_api_error(),
            AppError::Docx(e) => ApiError::new(
                ErrorCode::Tpl005PdfGenerationFailed,
                "DOCX generation failed",
                e.to_string(),
            ),
            AppError::InvalidParameter { name, message } => ApiError::new(
                ErrorCode::Api002InvalidParameter,
                "Invalid parameter",
                message,
            )
            .field(name),
            AppError::MalformedJson(message) => {
                ApiError::new(ErrorCode::Api001MalformedRequest, "Malformed request body", message)
            }
            AppError::MalformedYaml(message) => {
                ApiError::new(ErrorCode::Api001MalformedRequest, "Malformed YAML payload", message)
            }
            AppError::ResponseTooLarge(limit) => ApiError::new(
                ErrorCode::Api011ResponseTooLarge,
                "Generated artifact too large",
                format!("rendered output exceeds the {limit}-byte ceiling"),
            )
            .with_context(serde_json::json!({ "limitBytes": limit })),
            AppError::Timeout(seconds) => ApiError::new(
                ErrorCode::Api006ServiceUnavailable,
                "Request deadline exceeded",
                format!("compilation did not finish within {seconds}s"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let api_error = self.into_api_error();
        let status = StatusCode::from_u16(api_error.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = api_error.code.code(), message = %api_error.message, "request failed");
        }
        (status, Json(api_error.to_envelope())).into_response()
    }
}
