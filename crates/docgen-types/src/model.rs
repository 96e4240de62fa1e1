//! Core entities: request/response shapes, registry rows, cache and job
//! records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which kind of document is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover_letter",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "resume" => Ok(DocumentType::Resume),
            "cover_letter" => Ok(DocumentType::CoverLetter),
            other => Err(format!("unknown document type '{other}'")),
        }
    }
}

/// Output artifact format. Distinct from `typst-engine`'s `OutputFormat`
/// (pdf/svg/png), which only concerns the Typst compiler's own export
/// step — this is the document-level choice a client makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Pdf,
    Typst,
    Docx,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Typst => "typ",
            Format::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Pdf => "application/pdf",
            Format::Typst => "text/plain; charset=utf-8",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Page-density preset selecting margins, font size, and leading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacingMode {
    Normal,
    Compact,
    UltraCompact,
}

impl Default for SpacingMode {
    fn default() -> Self {
        SpacingMode::Compact
    }
}

impl SpacingMode {
    /// `(margin_cm, font_pt, leading_em)`.
    pub fn preamble_values(&self) -> (f32, f32, f32) {
        match self {
            SpacingMode::Normal => (0.8, 10.0, 0.60),
            SpacingMode::Compact => (0.55, 10.0, 0.50),
            SpacingMode::UltraCompact => (0.45, 9.5, 0.45),
        }
    }

    /// Estimated renderable lines per page, used by content analysis.
    pub fn lines_per_page(&self) -> u32 {
        match self {
            SpacingMode::Normal => 45,
            SpacingMode::Compact => 52,
            SpacingMode::UltraCompact => 58,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "normal" => Some(SpacingMode::Normal),
            "compact" => Some(SpacingMode::Compact),
            "ultra-compact" => Some(SpacingMode::UltraCompact),
            _ => None,
        }
    }
}

/// The client's work order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    pub template: String,
    #[serde(default)]
    pub format: Format,
    pub data: Value,
    #[serde(default)]
    pub ultra_validation: bool,
    #[serde(default)]
    pub spacing_mode: Option<SpacingMode>,
}

/// A registry row describing one `(document_type, template)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    pub document_type: DocumentType,
    pub description: String,
    pub required_fields: Vec<String>,
}

/// The rendered result of a single request, prior to HTTP serialization.
#[derive(Debug, Clone)]
pub struct RenderArtifact {
    pub format: Format,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub cache_status: CacheStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    NotApplicable,
}

impl CacheStatus {
    pub fn header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::NotApplicable => "BYPASS",
        }
    }
}

/// A stored cache record, mirroring the `pdf:`/`typst:` keyspace of §6.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub bytes: Vec<u8>,
    pub stored_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

/// A job's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
}

/// A job record persisted to the KV job store under `job:{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: uuid::Uuid,
    pub state: JobState,
    pub request: DocumentRequest,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub result_ref: Option<String>,
    pub error: Option<crate::error::ApiError>,
}

impl Job {
    pub fn new(request: DocumentRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            state: JobState::Pending,
            request,
            created_at: Utc::now(),
            finished_at: None,
            result_ref: None,
            error: None,
        }
    }
}

/// Per-client-IP rate-limit counter, persisted with TTL = window length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitBucket {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_success_and_error_are_mutually_exclusive_by_construction() {
        let req = DocumentRequest {
            document_type: DocumentType::Resume,
            template: "classic".into(),
            format: Format::Pdf,
            data: Value::Null,
            ultra_validation: false,
            spacing_mode: None,
        };
        let job = Job::new(req);
        assert!(job.result_ref.is_none());
        assert!(job.error.is_none());
        assert_eq!(job.state, JobState::Pending);
    }

    #[test]
    fn document_type_parses_hyphen_and_underscore_forms() {
        use std::str::FromStr;
        assert_eq!(DocumentType::from_str("cover-letter"), Ok(DocumentType::CoverLetter));
        assert_eq!(DocumentType::from_str("cover_letter"), Ok(DocumentType::CoverLetter));
        assert!(DocumentType::from_str("invoice").is_err());
    }

    #[test]
    fn spacing_mode_defaults_to_compact() {
        assert_eq!(SpacingMode::default(), SpacingMode::Compact);
    }

    #[test]
    fn spacing_mode_loose_parsing_accepts_both_separators() {
        assert_eq!(
            SpacingMode::from_str_loose("ultra-compact"),
            Some(SpacingMode::UltraCompact)
        );
        assert_eq!(
            SpacingMode::from_str_loose("ultra_compact"),
            Some(SpacingMode::UltraCompact)
        );
    }
}
