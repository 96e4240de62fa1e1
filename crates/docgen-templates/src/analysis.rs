//! Content analysis (§4.4.4): per-section metrics, aggregate estimates,
//! and plain-language recommendations.

use docgen_types::model::SpacingMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMetric {
    pub section: String,
    pub word_count: usize,
    pub char_count: usize,
    pub estimated_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sections: Vec<SectionMetric>,
    pub total_words: usize,
    pub total_chars: usize,
    pub estimated_pages: f64,
    pub spacing_mode: SpacingMode,
    pub recommendations: Vec<String>,
}

/// `ceil(chars / 75) + 2` — the constant 2 accounts for header/spacing
/// overhead per section.
fn estimated_lines(chars: usize) -> usize {
    chars.div_ceil(75) + 2
}

fn flatten_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str(s);
            out.push(' ');
        }
        Value::Array(items) => items.iter().for_each(|v| flatten_text(v, out)),
        Value::Object(map) => map.values().for_each(|v| flatten_text(v, out)),
        _ => {}
    }
}

fn section_metric(name: &str, value: Option<&Value>) -> Option<SectionMetric> {
    let value = value?;
    let mut text = String::new();
    flatten_text(value, &mut text);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let word_count = text.split_whitespace().count();
    let char_count = text.chars().count();
    Some(SectionMetric {
        section: name.to_string(),
        word_count,
        char_count,
        estimated_lines: estimated_lines(char_count),
    })
}

const SECTION_KEYS: &[&str] = &[
    "summary",
    "experience",
    "education",
    "skills",
    "certifications",
    "projects",
    "publications",
    "awards",
    "languages",
    "volunteer",
    "references",
    "body",
];

pub fn analyze_sections(data: &Value, spacing_mode: SpacingMode) -> AnalysisReport {
    let sections: Vec<SectionMetric> = SECTION_KEYS
        .iter()
        .filter_map(|key| section_metric(key, data.get(*key)))
        .collect();

    let total_words: usize = sections.iter().map(|s| s.word_count).sum();
    let total_chars: usize = sections.iter().map(|s| s.char_count).sum();
    let total_lines: usize = sections.iter().map(|s| s.estimated_lines).sum();

    let lines_per_page = spacing_mode.lines_per_page() as f64;
    let estimated_pages = if total_lines == 0 {
        0.0
    } else {
        total_lines as f64 / lines_per_page
    };

    let mut recommendations = Vec::new();
    let page_threshold = if spacing_mode == SpacingMode::Normal { 1.5 } else { 2.0 };
    if estimated_pages > page_threshold {
        recommendations.push(format!(
            "Content is estimated at {estimated_pages:.1} pages; consider a more compact spacing mode or trimming content."
        ));
    }
    if total_words > 800 {
        recommendations.push(format!(
            "Total word count ({total_words}) is high; consider trimming less relevant sections."
        ));
    }
    if spacing_mode == SpacingMode::Normal && estimated_pages > 1.0 {
        recommendations.push(
            "Switching from 'normal' to 'compact' spacing may fit this content on fewer pages."
                .to_string(),
        );
    }

    AnalysisReport {
        sections,
        total_words,
        total_chars,
        estimated_pages,
        spacing_mode,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_data_yields_zero_sections_and_no_recommendations() {
        let report = analyze_sections(&json!({}), SpacingMode::Compact);
        assert!(report.sections.is_empty());
        assert_eq!(report.total_words, 0);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn long_summary_triggers_length_recommendation() {
        let long_text = "word ".repeat(900);
        let report = analyze_sections(&json!({"summary": long_text}), SpacingMode::Compact);
        assert!(report.total_words >= 800);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("word count")));
    }

    #[test]
    fn estimated_lines_formula_matches_spec() {
        assert_eq!(estimated_lines(75), 3);
        assert_eq!(estimated_lines(76), 4);
        assert_eq!(estimated_lines(0), 2);
    }
}
