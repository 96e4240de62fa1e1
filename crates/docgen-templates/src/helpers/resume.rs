//! Résumé helpers: `classic`, `modern`, `two_column` (§4.4.3).

use docgen_types::model::DocumentType;
use serde_json::Value;

use crate::analysis::{analyze_sections, AnalysisReport};
use crate::error::TemplateError;
use crate::preamble::{emit_preamble, resolve_spacing_mode};
use crate::sections;

use super::{require_personal_info, Helper, HelperConfig};

pub const REQUIRED_FIELDS: &[&str] = &["personalInfo.name", "personalInfo.email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeVariant {
    Classic,
    Modern,
    TwoColumn,
}

pub struct ResumeHelper {
    pub data: Value,
    pub config: HelperConfig,
    pub variant: ResumeVariant,
}

impl ResumeHelper {
    pub fn new(data: Value, config: HelperConfig, variant: ResumeVariant) -> Self {
        Self { data, config, variant }
    }

    fn main_sections(&self) -> String {
        let mut out = String::new();
        out.push_str(&sections::summary(&self.data));
        out.push_str(&sections::experience(&self.data));
        out.push_str(&sections::projects(&self.data));
        out.push_str(&sections::publications(&self.data));
        out.push_str(&sections::volunteer(&self.data));
        out.push_str(&sections::awards(&self.data));
        out.push_str(&sections::references(&self.data));
        out
    }

    fn full_single_column(&self) -> String {
        let mut out = sections::header(&self.data);
        out.push_str(&self.main_sections());
        out.push_str(&sections::education(&self.data));
        out.push_str(&sections::skills(&self.data));
        out.push_str(&sections::certifications(&self.data));
        out.push_str(&sections::languages(&self.data));
        out
    }

    fn sidebar(&self) -> String {
        let mut inner = String::new();
        inner.push_str(&sections::header(&self.data));
        inner.push_str(&sections::skills(&self.data));
        inner.push_str(&sections::education(&self.data));
        inner.push_str(&sections::certifications(&self.data));
        inner.push_str(&sections::languages(&self.data));

        format!(
            "#block(fill: rgb(45, 55, 72), inset: 1em, width: 100%, height: 100%)[\n  \
             #set text(fill: white)\n  {inner}\n]"
        )
    }

    fn main_column(&self) -> String {
        self.main_sections()
    }

    fn variant_style(&self) -> &'static str {
        match self.variant {
            ResumeVariant::Classic => "#show heading.where(level: 2): set text(weight: \"bold\")\n#show heading.where(level: 2): set block(below: 0.4em)\n",
            ResumeVariant::Modern => "#show heading.where(level: 2): set text(weight: \"bold\", fill: rgb(45, 55, 72))\n#show heading.where(level: 2): it => [#it #line(length: 100%, stroke: 0.5pt + rgb(45, 55, 72))]\n",
            ResumeVariant::TwoColumn => "#show heading.where(level: 2): set text(weight: \"bold\")\n",
        }
    }
}

impl Helper for ResumeHelper {
    fn validate_data(&self) -> Result<(), TemplateError> {
        require_personal_info(&self.data)
    }

    fn render(&self) -> Result<String, TemplateError> {
        self.validate_data()?;

        let mode = resolve_spacing_mode(self.config.spacing_mode, &self.data);
        let mut out = emit_preamble(mode);
        out.push_str(self.variant_style());

        match self.variant {
            ResumeVariant::TwoColumn => {
                out.push_str(&format!(
                    "#grid(columns: (32%, 1fr), column-gutter: 1em)[\n{}\n][\n{}\n]\n",
                    self.sidebar(),
                    self.main_column()
                ));
            }
            ResumeVariant::Classic | ResumeVariant::Modern => {
                out.push_str(&self.full_single_column());
            }
        }

        Ok(out)
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn document_type(&self) -> DocumentType {
        DocumentType::Resume
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
            "personalInfo": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Mathematician and writer.",
            "experience": [{"position": "Analyst", "company": "Engine Co", "achievements": ["Wrote the first algorithm"]}],
        })
    }

    #[test]
    fn classic_renders_nonempty_markup() {
        let helper = ResumeHelper::new(sample(), HelperConfig::default(), ResumeVariant::Classic);
        let out = helper.render().unwrap();
        assert!(out.contains("Ada Lovelace"));
        assert!(out.contains("Analyst"));
    }

    #[test]
    fn two_column_wraps_sidebar_and_main_in_grid() {
        let helper = ResumeHelper::new(sample(), HelperConfig::default(), ResumeVariant::TwoColumn);
        let out = helper.render().unwrap();
        assert!(out.contains("#grid(columns: (32%, 1fr)"));
        assert!(out.contains("rgb(45, 55, 72)"));
    }

    #[test]
    fn missing_personal_info_raises_missing_field_error() {
        let helper = ResumeHelper::new(json!({}), HelperConfig::default(), ResumeVariant::Classic);
        let err = helper.render().unwrap_err();
        assert!(matches!(err, TemplateError::MissingRequiredField { .. }));
    }

    #[test]
    fn empty_experience_section_omitted_byte_identically() {
        let with_empty = json!({
            "personalInfo": {"name": "A", "email": "a@b.co"},
            "experience": [],
        });
        let without = json!({"personalInfo": {"name": "A", "email": "a@b.co"}});

        let a = ResumeHelper::new(with_empty, HelperConfig::default(), ResumeVariant::Classic)
            .render()
            .unwrap();
        let b = ResumeHelper::new(without, HelperConfig::default(), ResumeVariant::Classic)
            .render()
            .unwrap();
        assert_eq!(a, b);
    }
}
