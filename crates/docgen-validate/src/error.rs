//! Validation-specific error type, carrying one or more field-level issues.

use docgen_types::error::{ApiError, ErrorCode};

#[derive(Debug, Clone)]
pub struct Issue {
    pub code: ErrorCode,
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("validation failed: {} issue(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(code: ErrorCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                code,
                field: field.into(),
                message: message.into(),
                severity: Severity::Error,
            }],
        }
    }

    /// The first error-severity issue, formatted as an `ApiError`.
    pub fn into_api_error(self) -> ApiError {
        let first = self
            .issues
            .iter()
            .find(|i| i.severity == Severity::Error)
            .or_else(|| self.issues.first())
            .cloned()
            .expect("ValidationError always carries at least one issue");

        ApiError::new(first.code, "Validation failed", first.message.clone())
            .field(first.field.clone())
            .with_context(serde_json::json!({
                "field": first.field,
                "allIssues": self.issues.iter().map(|i| serde_json::json!({
                    "code": i.code.code(),
                    "field": i.field,
                    "message": i.message,
                    "severity": match i.severity { Severity::Error => "error", Severity::Warning => "warning" },
                })).collect::<Vec<_>>(),
            }))
    }
}
