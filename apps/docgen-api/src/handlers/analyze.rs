//! `POST /analyze`, `POST /analyze-pdf` — content-analysis endpoints
//! (§4.4.4): word/char/line estimates and plain-language
//! recommendations, with `/analyze-pdf` additionally compiling the
//! document to measure actual rendered page count.

use axum::Json;
use docgen_templates::analysis::analyze_sections;
use docgen_types::model::{DocumentType, SpacingMode};
use docgen_validate::validate_standard;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub document_type: DocumentType,
    pub data: Value,
    #[serde(default)]
    pub spacing_mode: Option<SpacingMode>,
}

fn resolve_spacing_mode(config_mode: Option<SpacingMode>, data: &Value) -> SpacingMode {
    docgen_templates::preamble::resolve_spacing_mode(config_mode, data)
}

pub async fn analyze(Json(request): Json<AnalyzeRequest>) -> Result<Json<Value>, AppError> {
    let normalized = validate_standard(request.document_type, &request.data)?;
    let spacing_mode = resolve_spacing_mode(request.spacing_mode, &normalized);
    let report = analyze_sections(&normalized, spacing_mode);
    Ok(Json(json!(report)))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzePdfRequest {
    pub document_type: DocumentType,
    pub template: String,
    pub data: Value,
    #[serde(default)]
    pub spacing_mode: Option<SpacingMode>,
}

pub async fn analyze_pdf(Json(request): Json<AnalyzePdfRequest>) -> Result<Json<Value>, AppError> {
    let normalized = validate_standard(request.document_type, &request.data)?;
    let spacing_mode = resolve_spacing_mode(request.spacing_mode, &normalized);
    let report = analyze_sections(&normalized, spacing_mode);

    let config = docgen_templates::HelperConfig {
        spacing_mode: Some(spacing_mode),
    };
    let source = docgen_orchestrator::render_source(
        request.document_type,
        &request.template,
        normalized,
        config,
    )?;
    let compiled = docgen_orchestrator::compile_pdf(source).await?;

    let density = if compiled.page_count == 0 {
        0.0
    } else {
        report.total_chars as f64 / compiled.page_count as f64
    };

    Ok(Json(json!({
        "estimate": report,
        "actualPageCount": compiled.page_count,
        "charsPerPage": density,
    })))
}
