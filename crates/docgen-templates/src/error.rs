//! Template-registry and rendering errors.

use docgen_types::error::{ApiError, ErrorCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{name}' not found for document type '{document_type}'")]
    NotFound {
        document_type: String,
        name: String,
        available: Vec<String>,
    },

    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    #[error("rendering failed: {message}")]
    RenderingFailed { message: String },
}

impl TemplateError {
    pub fn into_api_error(self) -> ApiError {
        match self {
            TemplateError::NotFound {
                document_type,
                name,
                available,
            } => ApiError::new(
                ErrorCode::Tpl001NotFound,
                "Template not found",
                format!("no template named '{name}' for document type '{document_type}'"),
            )
            .with_context(serde_json::json!({ "available_templates": available.join(", ") })),
            TemplateError::MissingRequiredField { field } => {
                ApiError::new(ErrorCode::Val001MissingField, "Missing required field", field.clone())
                    .field(field)
            }
            TemplateError::RenderingFailed { message } => {
                let truncated: String = message.chars().take(500).collect();
                ApiError::new(ErrorCode::Tpl003RenderingFailed, "Rendering failed", truncated)
            }
        }
    }
}
