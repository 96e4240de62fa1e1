//! Cover-letter helpers: `classic`, `modern` (§4.4.5).

use chrono::Local;
use docgen_types::escape::escape;
use docgen_types::fallback::field_with_fallback;
use docgen_types::model::DocumentType;
use serde_json::Value;

use crate::analysis::{analyze_sections, AnalysisReport};
use crate::error::TemplateError;
use crate::preamble::{emit_preamble, resolve_spacing_mode};
use crate::sections;

use super::{require_personal_info, Helper, HelperConfig};

pub const REQUIRED_FIELDS: &[&str] = &["personalInfo.name", "personalInfo.email", "body"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLetterVariant {
    Classic,
    Modern,
}

pub struct CoverLetterHelper {
    pub data: Value,
    pub config: HelperConfig,
    pub variant: CoverLetterVariant,
}

impl CoverLetterHelper {
    pub fn new(data: Value, config: HelperConfig, variant: CoverLetterVariant) -> Self {
        Self { data, config, variant }
    }

    /// Deterministic salutation when none was supplied, tried in order:
    /// `recipient.name`, `recipient.title`, `recipient.company`, plain.
    fn salutation(&self) -> String {
        if let Some(s) = self.data.get("salutation").and_then(Value::as_str) {
            if !s.is_empty() {
                return escape(s);
            }
        }

        let recipient = self.data.get("recipient");
        if let Some(recipient) = recipient {
            let name = field_with_fallback(recipient, "name", &[], "");
            if !name.is_empty() {
                return format!("Dear {},", escape(name));
            }
            let title = field_with_fallback(recipient, "title", &[], "");
            if !title.is_empty() {
                return format!("Dear {},", escape(title));
            }
            let company = field_with_fallback(recipient, "company", &[], "");
            if !company.is_empty() {
                return format!("Dear Hiring Manager at {},", escape(company));
            }
        }

        "Dear Hiring Manager,".to_string()
    }

    fn letter_date(&self) -> String {
        if let Some(s) = self.data.get("date").and_then(Value::as_str) {
            if !s.is_empty() {
                return escape(s);
            }
        }
        Local::now().format("%B %-d, %Y").to_string()
    }

    /// Body may be a single string or an ordered sequence of paragraphs;
    /// empty entries are skipped.
    fn body_paragraphs(&self) -> Vec<String> {
        match self.data.get("body") {
            Some(Value::String(s)) if !s.is_empty() => vec![escape(s)],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(escape)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn variant_style(&self) -> &'static str {
        match self.variant {
            CoverLetterVariant::Classic => "",
            CoverLetterVariant::Modern => {
                "#show heading.where(level: 2): set text(fill: rgb(45, 55, 72))\n"
            }
        }
    }
}

impl Helper for CoverLetterHelper {
    fn validate_data(&self) -> Result<(), TemplateError> {
        require_personal_info(&self.data)?;
        if self.body_paragraphs().is_empty() {
            return Err(TemplateError::MissingRequiredField {
                field: "body".to_string(),
            });
        }
        Ok(())
    }

    fn render(&self) -> Result<String, TemplateError> {
        self.validate_data()?;

        let mode = resolve_spacing_mode(self.config.spacing_mode, &self.data);
        let mut out = emit_preamble(mode);
        out.push_str(self.variant_style());
        out.push_str(&sections::header(&self.data));

        out.push_str(&format!("{}\n\n", self.letter_date()));
        out.push_str(&format!("{}\n\n", self.salutation()));

        for paragraph in self.body_paragraphs() {
            out.push_str(&paragraph);
            out.push_str("\n\n");
        }

        let closing = field_with_fallback(&self.data, "closing", &[], "Sincerely,");
        out.push_str(&format!("{}\n\n", escape(closing)));

        let name = self
            .data
            .get("personalInfo")
            .map(|p| field_with_fallback(p, "name", &[], ""))
            .unwrap_or("");
        out.push_str(&escape(name));
        out.push('\n');

        Ok(out)
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn document_type(&self) -> DocumentType {
        DocumentType::CoverLetter
    }

    fn analyze(&self) -> AnalysisReport {
        let mode = resolve_spacing_mode(self.config.spacing_mode, &self.data);
        analyze_sections(&self.data, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "personalInfo": {"name": "A B", "email": "a@b.co"},
            "body": ["Paragraph one.", "Paragraph two."],
        })
    }

    #[test]
    fn array_body_renders_paragraphs_separated_by_blank_line() {
        let helper = CoverLetterHelper::new(sample(), HelperConfig::default(), CoverLetterVariant::Classic);
        let out = helper.render().unwrap();
        assert!(out.contains("Paragraph one.\n\nParagraph two."));
    }

    #[test]
    fn salutation_falls_back_through_recipient_fields() {
        let mut data = sample();
        data["recipient"] = json!({"company": "Acme"});
        let helper = CoverLetterHelper::new(data, HelperConfig::default(), CoverLetterVariant::Classic);
        assert_eq!(helper.salutation(), "Dear Hiring Manager at Acme,");
    }

    #[test]
    fn salutation_defaults_when_no_recipient() {
        let helper = CoverLetterHelper::new(sample(), HelperConfig::default(), CoverLetterVariant::Classic);
        assert_eq!(helper.salutation(), "Dear Hiring Manager,");
    }

    #[test]
    fn missing_body_is_rejected() {
        let data = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});
        let helper = CoverLetterHelper::new(data, HelperConfig::default(), CoverLetterVariant::Classic);
        assert!(helper.validate_data().is_err());
    }

    #[test]
    fn explicit_date_is_used_verbatim() {
        let mut data = sample();
        data["date"] = json!("January 1, 2020");
        let helper = CoverLetterHelper::new(data, HelperConfig::default(), CoverLetterVariant::Classic);
        assert_eq!(helper.letter_date(), "January 1, 2020");
    }
}
