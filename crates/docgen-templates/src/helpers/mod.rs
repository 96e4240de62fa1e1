//! Per-template helpers (C4): stateless, constructed once per request,
//! composed from the shared section emitters.

pub mod cover_letter;
pub mod resume;

use docgen_types::model::{DocumentType, SpacingMode};
use serde_json::Value;

use crate::analysis::AnalysisReport;
use crate::error::TemplateError;

/// Config passed to every helper at construction. Fields mirror the
/// request-level knobs that affect rendering but aren't part of `data`.
#[derive(Debug, Clone, Default)]
pub struct HelperConfig {
    pub spacing_mode: Option<SpacingMode>,
}

/// The narrow behavioral contract every template helper satisfies,
/// selected at runtime from the registry rather than through
/// inheritance.
pub trait Helper {
    /// Helper-level required-field check. Idempotent: calling it
    /// repeatedly on the same data never has side effects and always
    /// produces the same verdict.
    fn validate_data(&self) -> Result<(), TemplateError>;

    /// Produce Typst markup. Never fails for optional-but-missing data
    /// — a missing optional section is simply omitted.
    fn render(&self) -> Result<String, TemplateError>;

    fn required_fields(&self) -> &'static [&'static str];

    fn document_type(&self) -> DocumentType;

    fn analyze(&self) -> AnalysisReport;
}

pub(crate) fn require_personal_info(data: &Value) -> Result<(), TemplateError> {
    let name = data
        .get("personalInfo")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if name.is_empty() {
        return Err(TemplateError::MissingRequiredField {
            field: "personalInfo.name".to_string(),
        });
    }
    let email = data
        .get("personalInfo")
        .and_then(|p| p.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if email.is_empty() {
        return Err(TemplateError::MissingRequiredField {
            field: "personalInfo.email".to_string(),
        });
    }
    Ok(())
}
