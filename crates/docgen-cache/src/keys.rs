//! Content-addressed cache key derivation (§4.7, §9).
//!
//! Keys are derived from the canonical JSON serialization of
//! `{document_type, template, data, format}`: object keys sorted
//! recursively so that logically-equal payloads with differently
//! ordered keys hash identically. (Full Unicode NFC normalization is
//! not performed here — the workspace carries no normalization crate,
//! and well-formed JSON input from typical clients is already composed
//! — see DESIGN.md.)

use docgen_types::model::{DocumentType, Format};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Recursively rebuild a `Value` with object keys in sorted order so
/// `serde_json::to_string` produces a canonical byte sequence.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = serde_json::Map::new();
            for (k, v) in entries {
                sorted.insert(k.clone(), canonicalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Derive the full cache key, e.g. `pdf:resume:classic:<sha256>`.
pub fn derive_key(
    document_type: DocumentType,
    template: &str,
    data: &Value,
    format: Format,
) -> String {
    let payload = serde_json::json!({
        "document_type": document_type.as_str(),
        "template": template,
        "data": canonicalize(data),
        "format": format,
    });
    let canonical = canonicalize(&payload);
    let serialized = serde_json::to_string(&canonical).expect("canonicalized Value always serializes");
    let hash = sha256_hex(serialized.as_bytes());

    let prefix = match format {
        Format::Pdf => "pdf",
        Format::Typst => "typst",
        Format::Docx => "docx",
    };
    format!("{prefix}:{}:{template}:{hash}", document_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_is_deterministic_for_identical_input() {
        let data = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});
        let a = derive_key(DocumentType::Resume, "classic", &data, Format::Pdf);
        let b = derive_key(DocumentType::Resume, "classic", &data, Format::Pdf);
        assert_eq!(a, b);
    }

    #[test]
    fn key_insensitive_to_object_key_order() {
        let a = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});
        let b = json!({"personalInfo": {"email": "a@b.co", "name": "A"}});
        let key_a = derive_key(DocumentType::Resume, "classic", &a, Format::Pdf);
        let key_b = derive_key(DocumentType::Resume, "classic", &b, Format::Pdf);
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn different_templates_yield_different_keys() {
        let data = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});
        let classic = derive_key(DocumentType::Resume, "classic", &data, Format::Pdf);
        let modern = derive_key(DocumentType::Resume, "modern", &data, Format::Pdf);
        assert_ne!(classic, modern);
    }

    #[test]
    fn key_carries_expected_prefix_and_segments() {
        let data = json!({});
        let key = derive_key(DocumentType::Resume, "classic", &data, Format::Typst);
        assert!(key.starts_with("typst:resume:classic:"));
    }
}
