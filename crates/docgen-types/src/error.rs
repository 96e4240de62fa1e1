//! Stable error-code taxonomy and the wire error body shape (§6, §7).
//!
//! Every crate in the workspace defines its own local error enum and
//! converts into [`ApiError`] at its boundary; `apps/docgen-api` is the
//! only place that serializes one onto the wire, so the JSON shape is
//! produced in exactly one spot.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stable, documented error code. The numeric suffix is never
/// reassigned to a different meaning once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation — HTTP 400
    Val001MissingField,
    Val002WrongType,
    Val003InvalidEmail,
    Val004InvalidPhone,
    Val005InvalidUrl,
    Val006InvalidDate,
    Val007SchemaFailure,
    Val008MaliciousMarkup,
    // Template — 404/500
    Tpl001NotFound,
    Tpl002CompilationFailed,
    Tpl003RenderingFailed,
    Tpl004DependencyMissing,
    Tpl005PdfGenerationFailed,
    Tpl006UnsupportedFormat,
    // API — 400/404/413/429/503
    Api001MalformedRequest,
    Api002InvalidParameter,
    Api003RateLimitExceeded,
    Api004ResourceNotFound,
    Api005RequestTooLarge,
    Api006ServiceUnavailable,
    Api011ResponseTooLarge,
    // System — 500/503
    Sys001Unexpected,
    Sys002DependencyNotFound,
    Sys003ResourceExhausted,
    // Security — 400
    Sec001InjectedControlSequence,
    Sec002PathTraversal,
    Sec003OversizedInput,
}

impl ErrorCode {
    /// The stable string code used on the wire (`"VAL001"`, `"TPL001"`, …).
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Val001MissingField => "VAL001",
            ErrorCode::Val002WrongType => "VAL002",
            ErrorCode::Val003InvalidEmail => "VAL003",
            ErrorCode::Val004InvalidPhone => "VAL004",
            ErrorCode::Val005InvalidUrl => "VAL005",
            ErrorCode::Val006InvalidDate => "VAL006",
            ErrorCode::Val007SchemaFailure => "VAL007",
            ErrorCode::Val008MaliciousMarkup => "VAL008",
            ErrorCode::Tpl001NotFound => "TPL001",
            ErrorCode::Tpl002CompilationFailed => "TPL002",
            ErrorCode::Tpl003RenderingFailed => "TPL003",
            ErrorCode::Tpl004DependencyMissing => "TPL004",
            ErrorCode::Tpl005PdfGenerationFailed => "TPL005",
            ErrorCode::Tpl006UnsupportedFormat => "TPL006",
            ErrorCode::Api001MalformedRequest => "API001",
            ErrorCode::Api002InvalidParameter => "API002",
            ErrorCode::Api003RateLimitExceeded => "API003",
            ErrorCode::Api004ResourceNotFound => "API004",
            ErrorCode::Api005RequestTooLarge => "API005",
            ErrorCode::Api006ServiceUnavailable => "API006",
            ErrorCode::Api011ResponseTooLarge => "API011",
            ErrorCode::Sys001Unexpected => "SYS001",
            ErrorCode::Sys002DependencyNotFound => "SYS002",
            ErrorCode::Sys003ResourceExhausted => "SYS003",
            ErrorCode::Sec001InjectedControlSequence => "SEC001",
            ErrorCode::Sec002PathTraversal => "SEC002",
            ErrorCode::Sec003OversizedInput => "SEC003",
        }
    }

    pub fn category(&self) -> &'static str {
        match self.code().split_at(3).0 {
            "VAL" => "validation",
            "TPL" => "template",
            "API" => "api",
            "SYS" => "system",
            "SEC" => "security",
            _ => "unknown",
        }
    }

    /// HTTP status this code maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::Val001MissingField
            | ErrorCode::Val002WrongType
            | ErrorCode::Val003InvalidEmail
            | ErrorCode::Val004InvalidPhone
            | ErrorCode::Val005InvalidUrl
            | ErrorCode::Val006InvalidDate
            | ErrorCode::Val007SchemaFailure
            | ErrorCode::Val008MaliciousMarkup
            | ErrorCode::Api001MalformedRequest
            | ErrorCode::Api002InvalidParameter
            | ErrorCode::Sec001InjectedControlSequence
            | ErrorCode::Sec002PathTraversal
            | ErrorCode::Sec003OversizedInput => 400,
            ErrorCode::Tpl001NotFound | ErrorCode::Api004ResourceNotFound => 404,
            ErrorCode::Api005RequestTooLarge | ErrorCode::Api011ResponseTooLarge => 413,
            ErrorCode::Api003RateLimitExceeded => 429,
            ErrorCode::Tpl002CompilationFailed
            | ErrorCode::Tpl003RenderingFailed
            | ErrorCode::Tpl004DependencyMissing
            | ErrorCode::Tpl005PdfGenerationFailed
            | ErrorCode::Tpl006UnsupportedFormat
            | ErrorCode::Sys001Unexpected
            | ErrorCode::Sys002DependencyNotFound => 500,
            ErrorCode::Api006ServiceUnavailable | ErrorCode::Sys003ResourceExhausted => 503,
        }
    }
}

/// The wire body produced for any non-2xx response except 429 (which adds
/// `Retry-After`/`X-RateLimit-*` headers alongside the same body shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    pub timestamp: chrono::DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub context: Value,
}

impl ApiError {
    pub fn new(code: ErrorCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            title: title.into(),
            message: message.into(),
            suggested_fix: None,
            timestamp: Utc::now(),
            context: Value::Null,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn field(mut self, field_path: impl Into<String>) -> Self {
        self.context = serde_json::json!({ "field": field_path.into() });
        self
    }

    /// Outer `{"error": {...}}` envelope specified by §6.
    pub fn to_envelope(&self) -> Value {
        serde_json::json!({
            "error": {
                "code": self.code.code(),
                "category": self.code.category(),
                "severity": if self.code.http_status() >= 500 { "error" } else { "error" },
                "title": self.title,
                "message": self.message,
                "suggestedFix": self.suggested_fix,
                "timestamp": self.timestamp.to_rfc3339(),
                "context": self.context,
            }
        })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_expected_shape() {
        let err = ApiError::new(ErrorCode::Val001MissingField, "Missing field", "personalInfo.email is required")
            .field("personalInfo.email");
        let envelope = err.to_envelope();
        assert_eq!(envelope["error"]["code"], "VAL001");
        assert_eq!(envelope["error"]["category"], "validation");
        assert_eq!(envelope["error"]["context"]["field"], "personalInfo.email");
    }

    #[test]
    fn http_status_mapping_matches_spec_categories() {
        assert_eq!(ErrorCode::Val001MissingField.http_status(), 400);
        assert_eq!(ErrorCode::Tpl001NotFound.http_status(), 404);
        assert_eq!(ErrorCode::Api003RateLimitExceeded.http_status(), 429);
        assert_eq!(ErrorCode::Api005RequestTooLarge.http_status(), 413);
        assert_eq!(ErrorCode::Sys001Unexpected.http_status(), 500);
        assert_eq!(ErrorCode::Api006ServiceUnavailable.http_status(), 503);
    }
}
