use docgen_types::error::{ApiError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Validation(#[from] docgen_validate::ValidationError),

    #[error(transparent)]
    Template(#[from] docgen_templates::TemplateError),

    #[error(transparent)]
    Docx(#[from] docgen_docx::DocxError),

    #[error("typst compilation failed: {0}")]
    Compile(#[from] typst_engine::compiler::ServerError),

    #[error("compile produced errors: {0:?}")]
    CompileErrors(Vec<typst_engine::compiler::CompileError>),
}

impl OrchestratorError {
    pub fn into_api_error(self) -> ApiError {
        match self {
            OrchestratorError::Validation(e) => e.into_api_error(),
            OrchestratorError::Template(e) => e.into_api_error(),
            OrchestratorError::Docx(e) => ApiError::new(
                ErrorCode::Tpl005PdfGenerationFailed,
                "DOCX generation failed",
                e.to_string(),
            ),
            OrchestratorError::Compile(e) => ApiError::new(
                ErrorCode::Tpl002CompilationFailed,
                "Typst compilation failed",
                e.to_string(),
            ),
            OrchestratorError::CompileErrors(errors) => {
                let message = errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
                    .join("; ");
                ApiError::new(ErrorCode::Tpl002CompilationFailed, "Typst compilation failed", message)
                    .with_context(serde_json::json!({ "diagnostics": errors }))
            }
        }
    }
}
