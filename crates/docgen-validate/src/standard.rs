//! Standard (non-normalizing) validation.

use docgen_types::error::ErrorCode;
use docgen_types::model::DocumentType;
use serde_json::Value;

use crate::error::{Issue, Severity, ValidationError};
use crate::patterns::is_valid_date_shape;

const DATE_FIELDS: &[&str] = &["startDate", "endDate", "graduationDate"];

/// Run the standard validation pass. Fails fast on the first
/// disqualifying error. Returns a normalized clone of `data` with the
/// legacy `title` → `position` alias applied to experience entries; the
/// input itself is never mutated.
pub fn validate_standard(
    document_type: DocumentType,
    data: &Value,
) -> Result<Value, ValidationError> {
    let personal_info = data.get("personalInfo").ok_or_else(|| {
        ValidationError::single(
            ErrorCode::Val001MissingField,
            "personalInfo",
            "personalInfo is required",
        )
    })?;

    if !personal_info.is_object() {
        return Err(ValidationError::single(
            ErrorCode::Val002WrongType,
            "personalInfo",
            "personalInfo must be an object",
        ));
    }

    require_nonempty_string(personal_info, "name", "personalInfo.name")?;
    require_nonempty_string(personal_info, "email", "personalInfo.email")?;

    if document_type == DocumentType::CoverLetter {
        require_body_present(data)?;
    }

    check_date_fields(data, "experience")?;
    check_date_fields(data, "education")?;

    let mut normalized = data.clone();
    alias_title_to_position(&mut normalized);

    Ok(normalized)
}

fn require_nonempty_string(obj: &Value, key: &str, field_path: &str) -> Result<(), ValidationError> {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(ValidationError::single(
            ErrorCode::Val001MissingField,
            field_path,
            format!("{field_path} is required"),
        )),
    }
}

fn require_body_present(data: &Value) -> Result<(), ValidationError> {
    match data.get("body") {
        Some(Value::String(s)) if !s.is_empty() => Ok(()),
        Some(Value::Array(items)) if !items.is_empty() => Ok(()),
        _ => Err(ValidationError::single(
            ErrorCode::Val001MissingField,
            "body",
            "body is required for cover letters",
        )),
    }
}

fn check_date_fields(data: &Value, section: &str) -> Result<(), ValidationError> {
    let Some(entries) = data.get(section).and_then(Value::as_array) else {
        return Ok(());
    };

    for (i, entry) in entries.iter().enumerate() {
        for field in DATE_FIELDS {
            let Some(value) = entry.get(field).and_then(Value::as_str) else {
                continue;
            };
            if !is_valid_date_shape(value) {
                return Err(ValidationError {
                    issues: vec![Issue {
                        code: ErrorCode::Val006InvalidDate,
                        field: format!("{section}.{i}.{field}"),
                        message: format!("{section}.{i}.{field} is not a recognized date shape"),
                        severity: Severity::Error,
                    }],
                });
            }
        }
    }

    Ok(())
}

/// `title` is a legacy alias for `position` on experience entries; when
/// only `title` is present, copy it forward so downstream helpers (which
/// look up `position` with `title`/`role` as fallbacks) see a consistent
/// shape either way. This is purely additive — existing keys are kept.
fn alias_title_to_position(data: &mut Value) {
    let Some(entries) = data.get_mut("experience").and_then(Value::as_array_mut) else {
        return;
    };

    for entry in entries {
        let Some(obj) = entry.as_object_mut() else {
            continue;
        };
        let has_position = obj.get("position").and_then(Value::as_str).map(|s| !s.is_empty()).unwrap_or(false);
        if has_position {
            continue;
        }
        if let Some(title) = obj.get("title").cloned() {
            obj.insert("position".to_string(), title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_personal_info_is_val001() {
        let data = json!({});
        let err = validate_standard(DocumentType::Resume, &data).unwrap_err();
        assert_eq!(err.issues[0].code.code(), "VAL001");
        assert_eq!(err.issues[0].field, "personalInfo");
    }

    #[test]
    fn missing_email_is_val001_with_field_path() {
        let data = json!({"personalInfo": {"name": "A"}});
        let err = validate_standard(DocumentType::Resume, &data).unwrap_err();
        assert_eq!(err.issues[0].field, "personalInfo.email");
    }

    #[test]
    fn cover_letter_requires_body() {
        let data = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});
        let err = validate_standard(DocumentType::CoverLetter, &data).unwrap_err();
        assert_eq!(err.issues[0].field, "body");
    }

    #[test]
    fn cover_letter_accepts_array_body() {
        let data = json!({
            "personalInfo": {"name": "A", "email": "a@b.co"},
            "body": ["P1", "P2"],
        });
        assert!(validate_standard(DocumentType::CoverLetter, &data).is_ok());
    }

    #[test]
    fn invalid_experience_date_is_val006() {
        let data = json!({
            "personalInfo": {"name": "A", "email": "a@b.co"},
            "experience": [{"startDate": "not-a-date"}],
        });
        let err = validate_standard(DocumentType::Resume, &data).unwrap_err();
        assert_eq!(err.issues[0].code.code(), "VAL006");
        assert_eq!(err.issues[0].field, "experience.0.startDate");
    }

    #[test]
    fn legacy_title_aliased_to_position() {
        let data = json!({
            "personalInfo": {"name": "A", "email": "a@b.co"},
            "experience": [{"title": "Engineer"}],
        });
        let normalized = validate_standard(DocumentType::Resume, &data).unwrap();
        assert_eq!(normalized["experience"][0]["position"], "Engineer");
        assert_eq!(normalized["experience"][0]["title"], "Engineer");
    }

    #[test]
    fn original_input_is_not_mutated() {
        let data = json!({
            "personalInfo": {"name": "A", "email": "a@b.co"},
            "experience": [{"title": "Engineer"}],
        });
        let original = data.clone();
        let _ = validate_standard(DocumentType::Resume, &data).unwrap();
        assert_eq!(data, original);
    }
}
