//! Ordered-fallback and dotted-path lookups against open-shape JSON data.
//!
//! The résumé/cover-letter payload is a dynamically-keyed map with many
//! historical aliases for the same concept (`title`/`position`/`role`,
//! `endDate`/`end_date`). These helpers centralize the "first truthy
//! wins" lookup so every template helper resolves aliases the same way.

use serde_json::Value;

/// Returns `true` for everything JSON considers present content: not
/// `null`, not an empty string. Numbers, bools, non-empty arrays/objects
/// all count as truthy here, matching the falsy-empty-string rule that
/// section rendering depends on.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Return `obj[primary]` if truthy; else the first truthy
/// `obj[fallback]`; else `default`. An empty string counts as falsy.
pub fn field_with_fallback<'a>(
    obj: &'a Value,
    primary: &str,
    fallbacks: &[&str],
    default: &'a str,
) -> &'a str {
    if let Some(v) = obj.get(primary) {
        if is_truthy(v) {
            if let Some(s) = v.as_str() {
                return s;
            }
        }
    }
    for fallback in fallbacks {
        if let Some(v) = obj.get(*fallback) {
            if is_truthy(v) {
                if let Some(s) = v.as_str() {
                    return s;
                }
            }
        }
    }
    default
}

/// Like [`field_with_fallback`] but returns an owned `String`, useful
/// when the resolved value must outlive a temporary (e.g. a non-string
/// JSON value rendered via `to_string`).
pub fn field_with_fallback_owned(
    obj: &Value,
    primary: &str,
    fallbacks: &[&str],
    default: &str,
) -> String {
    if let Some(v) = obj.get(primary) {
        if is_truthy(v) {
            return value_to_display(v);
        }
    }
    for fallback in fallbacks {
        if let Some(v) = obj.get(*fallback) {
            if is_truthy(v) {
                return value_to_display(v);
            }
        }
    }
    default.to_string()
}

fn value_to_display(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Navigate a dotted path (`personalInfo.name`, `experience.0.title`)
/// into a JSON value. Numeric segments index arrays.
pub fn get_path<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = obj;
    for segment in path.split('.') {
        current = if let Ok(index) = segment.parse::<usize>() {
            current.as_array()?.get(index)?
        } else {
            current.as_object()?.get(segment)?
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primary_wins_when_truthy() {
        let obj = json!({"title": "Engineer", "position": "Manager"});
        assert_eq!(field_with_fallback(&obj, "title", &["position"], ""), "Engineer");
    }

    #[test]
    fn empty_string_falls_through_to_fallback() {
        let obj = json!({"title": "", "position": "Manager"});
        assert_eq!(field_with_fallback(&obj, "title", &["position"], ""), "Manager");
    }

    #[test]
    fn missing_primary_and_fallbacks_returns_default() {
        let obj = json!({});
        assert_eq!(field_with_fallback(&obj, "title", &["position"], "N/A"), "N/A");
    }

    #[test]
    fn first_truthy_fallback_among_several_wins() {
        let obj = json!({"endDate": null, "end_date": "", "finishDate": "2020-01"});
        assert_eq!(
            field_with_fallback(&obj, "endDate", &["end_date", "finishDate"], ""),
            "2020-01"
        );
    }

    #[test]
    fn get_path_navigates_nested_objects_and_arrays() {
        let obj = json!({"experience": [{"title": "Engineer"}]});
        assert_eq!(
            get_path(&obj, "experience.0.title").and_then(|v| v.as_str()),
            Some("Engineer")
        );
    }

    #[test]
    fn get_path_missing_segment_is_none() {
        let obj = json!({"personalInfo": {"name": "A"}});
        assert!(get_path(&obj, "personalInfo.phone").is_none());
    }
}
