//! Static template registry (C3): `(document_type, template) -> helper
//! constructor + metadata`.

use docgen_types::model::{DocumentType, TemplateInfo};
use serde_json::Value;

use crate::error::TemplateError;
use crate::helpers::cover_letter::{CoverLetterHelper, CoverLetterVariant};
use crate::helpers::resume::{ResumeHelper, ResumeVariant};
use crate::helpers::{Helper, HelperConfig};

fn resume_templates() -> Vec<TemplateInfo> {
    vec![
        TemplateInfo {
            name: "classic".to_string(),
            document_type: DocumentType::Resume,
            description: "Single-column résumé with plain section headings.".to_string(),
            required_fields: vec!["personalInfo.name".to_string(), "personalInfo.email".to_string()],
        },
        TemplateInfo {
            name: "modern".to_string(),
            document_type: DocumentType::Resume,
            description: "Single-column résumé with accent-colored section rules.".to_string(),
            required_fields: vec!["personalInfo.name".to_string(), "personalInfo.email".to_string()],
        },
        TemplateInfo {
            name: "two_column".to_string(),
            document_type: DocumentType::Resume,
            description: "Two-column résumé with a dark sidebar for contact/skills/education.".to_string(),
            required_fields: vec!["personalInfo.name".to_string(), "personalInfo.email".to_string()],
        },
    ]
}

fn cover_letter_templates() -> Vec<TemplateInfo> {
    vec![
        TemplateInfo {
            name: "classic".to_string(),
            document_type: DocumentType::CoverLetter,
            description: "Plain cover letter layout.".to_string(),
            required_fields: vec![
                "personalInfo.name".to_string(),
                "personalInfo.email".to_string(),
                "body".to_string(),
            ],
        },
        TemplateInfo {
            name: "modern".to_string(),
            document_type: DocumentType::CoverLetter,
            description: "Cover letter with accent-colored heading.".to_string(),
            required_fields: vec![
                "personalInfo.name".to_string(),
                "personalInfo.email".to_string(),
                "body".to_string(),
            ],
        },
    ]
}

/// List every registered template, optionally scoped to one document
/// type.
pub fn list(document_type: Option<DocumentType>) -> Vec<TemplateInfo> {
    let mut all = resume_templates();
    all.extend(cover_letter_templates());
    match document_type {
        Some(dt) => all.into_iter().filter(|t| t.document_type == dt).collect(),
        None => all,
    }
}

pub fn get(document_type: DocumentType, template: &str) -> Result<TemplateInfo, TemplateError> {
    list(Some(document_type))
        .into_iter()
        .find(|t| t.name == template)
        .ok_or_else(|| not_found(document_type, template))
}

fn not_found(document_type: DocumentType, template: &str) -> TemplateError {
    TemplateError::NotFound {
        document_type: document_type.to_string(),
        name: template.to_string(),
        available: list(Some(document_type)).into_iter().map(|t| t.name).collect(),
    }
}

/// Construct the helper for `(document_type, template)`. Unknown names
/// produce a `TemplateError::NotFound` listing available names.
pub fn helper_of(
    document_type: DocumentType,
    template: &str,
    data: Value,
    config: HelperConfig,
) -> Result<Box<dyn Helper>, TemplateError> {
    match document_type {
        DocumentType::Resume => {
            let variant = match template {
                "classic" => ResumeVariant::Classic,
                "modern" => ResumeVariant::Modern,
                "two_column" => ResumeVariant::TwoColumn,
                _ => return Err(not_found(document_type, template)),
            };
            Ok(Box::new(ResumeHelper::new(data, config, variant)))
        }
        DocumentType::CoverLetter => {
            let variant = match template {
                "classic" => CoverLetterVariant::Classic,
                "modern" => CoverLetterVariant::Modern,
                _ => return Err(not_found(document_type, template)),
            };
            Ok(Box::new(CoverLetterHelper::new(data, config, variant)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_all_includes_both_document_types() {
        let all = list(None);
        assert!(all.iter().any(|t| t.document_type == DocumentType::Resume));
        assert!(all.iter().any(|t| t.document_type == DocumentType::CoverLetter));
    }

    #[test]
    fn unknown_template_lists_available_names() {
        let err = helper_of(DocumentType::Resume, "neon", json!({}), HelperConfig::default())
            .unwrap_err();
        match err {
            TemplateError::NotFound { available, .. } => {
                assert!(available.contains(&"classic".to_string()));
                assert!(available.contains(&"two_column".to_string()));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn known_template_constructs_helper() {
        let helper = helper_of(DocumentType::Resume, "classic", json!({}), HelperConfig::default());
        assert!(helper.is_ok());
    }
}
