//! Ultra validation: standard checks plus normalization (email
//! canonicalization, URL scheme fixup) and warning accumulation.

use docgen_types::error::ErrorCode;
use docgen_types::model::DocumentType;
use serde_json::Value;

use crate::error::{Issue, Severity, ValidationError};
use crate::patterns::{EMAIL, HAS_SCHEME};
use crate::standard::validate_standard;

const URL_FIELDS: &[&str] = &["website", "linkedin", "github"];

/// Run ultra validation. Normalizes email (trim + lowercase) and
/// URL-ish fields (prepend `https://` when no scheme is present,
/// recording a warning rather than an error), then collects every
/// issue found. Raises only if any issue has `Severity::Error`, or, in
/// `strict` mode, if any warning was recorded either.
pub fn validate_ultra(
    document_type: DocumentType,
    data: &Value,
    strict: bool,
) -> Result<(Value, Vec<Issue>), ValidationError> {
    let mut normalized = validate_standard(document_type, data)?;
    let mut issues = Vec::new();

    normalize_email(&mut normalized, &mut issues);
    for field in URL_FIELDS {
        normalize_url_scheme(&mut normalized, field, &mut issues);
    }

    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    let has_warning = issues.iter().any(|i| i.severity == Severity::Warning);

    if has_error || (strict && has_warning) {
        return Err(ValidationError { issues });
    }

    Ok((normalized, issues))
}

fn normalize_email(data: &mut Value, issues: &mut Vec<Issue>) {
    let Some(email) = data
        .get("personalInfo")
        .and_then(|p| p.get("email"))
        .and_then(Value::as_str)
    else {
        return;
    };

    let normalized = email.trim().to_lowercase();

    if !EMAIL.is_match(&normalized) {
        issues.push(Issue {
            code: ErrorCode::Val003InvalidEmail,
            field: "personalInfo.email".to_string(),
            message: format!("'{email}' is not a valid email address"),
            severity: Severity::Error,
        });
        return;
    }

    if let Some(obj) = data.get_mut("personalInfo").and_then(Value::as_object_mut) {
        obj.insert("email".to_string(), Value::String(normalized));
    }
}

fn normalize_url_scheme(data: &mut Value, field: &str, issues: &mut Vec<Issue>) {
    let Some(personal_info) = data.get_mut("personalInfo") else {
        return;
    };
    let Some(obj) = personal_info.as_object_mut() else {
        return;
    };
    let Some(value) = obj.get(field).and_then(Value::as_str) else {
        return;
    };
    if value.is_empty() || HAS_SCHEME.is_match(value) {
        return;
    }

    let fixed = format!("https://{value}");
    issues.push(Issue {
        code: ErrorCode::Val005InvalidUrl,
        field: format!("personalInfo.{field}"),
        message: format!("'{value}' was missing a scheme; assumed https://"),
        severity: Severity::Warning,
    });
    obj.insert(field.to_string(), Value::String(fixed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "personalInfo": {
                "name": "A B",
                "email": "  A@Example.COM  ",
                "website": "example.com",
            }
        })
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let (normalized, issues) = validate_ultra(DocumentType::Resume, &base(), false).unwrap();
        assert_eq!(normalized["personalInfo"]["email"], "a@example.com");
        assert!(issues.iter().all(|i| i.severity != Severity::Error));
    }

    #[test]
    fn invalid_email_after_trim_is_error() {
        let data = json!({"personalInfo": {"name": "A", "email": "not-an-email"}});
        let err = validate_ultra(DocumentType::Resume, &data, false).unwrap_err();
        assert_eq!(err.issues[0].code.code(), "VAL003");
    }

    #[test]
    fn missing_scheme_url_is_fixed_with_warning() {
        let (normalized, issues) = validate_ultra(DocumentType::Resume, &base(), false).unwrap();
        assert_eq!(normalized["personalInfo"]["website"], "https://example.com");
        assert!(issues
            .iter()
            .any(|i| i.field == "personalInfo.website" && i.severity == Severity::Warning));
    }

    #[test]
    fn strict_mode_rejects_on_warning() {
        let err = validate_ultra(DocumentType::Resume, &base(), true).unwrap_err();
        assert!(err.issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn non_strict_mode_succeeds_despite_warning() {
        assert!(validate_ultra(DocumentType::Resume, &base(), false).is_ok());
    }

    #[test]
    fn ultra_output_always_passes_standard_validation_again() {
        let (normalized, _) = validate_ultra(DocumentType::Resume, &base(), false).unwrap();
        assert!(validate_standard(DocumentType::Resume, &normalized).is_ok());
    }
}
