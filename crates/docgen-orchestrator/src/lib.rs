//! Synchronous render pipeline (C8, §4.8): the seven-step path a single
//! `/generate` call walks through. `docgen-jobs` drives this same
//! pipeline from its worker pool for the async `/generate/async` path.

pub mod error;
pub mod singleflight;

pub use error::OrchestratorError;

use base64::Engine as _;
use docgen_cache::DocumentCache;
use docgen_types::fallback::field_with_fallback;
use docgen_types::model::{CacheStatus, DocumentRequest, Format, RenderArtifact};
use docgen_validate::{validate_standard, validate_ultra};
use serde_json::Value;
use singleflight::SingleFlight;
use std::sync::Arc;
use typst_engine::compiler::{self, RenderRequest as EngineRequest};
use typst_engine::compiler::output::OutputFormat as EngineFormat;

const COMPILE_TIMEOUT_MS: u64 = 10_000;

pub struct Orchestrator {
    cache: Arc<DocumentCache>,
    flight: SingleFlight,
}

impl Orchestrator {
    pub fn new(cache: Arc<DocumentCache>) -> Self {
        Self {
            cache,
            flight: SingleFlight::new(),
        }
    }

    pub async fn render(&self, request: DocumentRequest) -> Result<RenderArtifact, OrchestratorError> {
        // 1+3: structural/semantic validation (also normalizes legacy aliases).
        let normalized = if request.ultra_validation {
            validate_ultra(request.document_type, &request.data, false)?.0
        } else {
            validate_standard(request.document_type, &request.data)?
        };

        // 2: resolve the template helper.
        let config = docgen_templates::HelperConfig {
            spacing_mode: request.spacing_mode,
        };
        let helper = docgen_templates::helper_of(
            request.document_type,
            &request.template,
            normalized.clone(),
            config,
        )?;
        helper.validate_data()?;

        let filename = build_filename(request.document_type, &normalized, request.format);

        // 4: DOCX is a side-channel — no Typst, no cache, no single-flight.
        if request.format == Format::Docx {
            let (bytes, filename) = docgen_docx::generate_docx(request.document_type, &normalized)?;
            return Ok(RenderArtifact {
                format: Format::Docx,
                filename,
                bytes,
                cache_status: CacheStatus::NotApplicable,
            });
        }

        // 5: cache lookup.
        if let Some(bytes) = self
            .cache
            .get(request.document_type, &request.template, &normalized, request.format)
            .await
        {
            return Ok(RenderArtifact {
                format: request.format,
                filename,
                bytes,
                cache_status: CacheStatus::Hit,
            });
        }

        // 6+7: single-flight render, recheck cache after acquiring the lock
        // in case a concurrent caller already filled it while we waited.
        let key = docgen_cache::keys::derive_key(
            request.document_type,
            &request.template,
            &normalized,
            request.format,
        );
        let _guard = self.flight.acquire(&key).await;
        if let Some(bytes) = self
            .cache
            .get(request.document_type, &request.template, &normalized, request.format)
            .await
        {
            return Ok(RenderArtifact {
                format: request.format,
                filename,
                bytes,
                cache_status: CacheStatus::Hit,
            });
        }

        let source = helper.render()?;
        let bytes = match request.format {
            Format::Typst => source.clone().into_bytes(),
            Format::Pdf => compile_pdf(source).await?.bytes,
            Format::Docx => unreachable!("handled above"),
        };

        self.cache
            .set(
                request.document_type,
                &request.template,
                &normalized,
                request.format,
                bytes.clone(),
            )
            .await;

        Ok(RenderArtifact {
            format: request.format,
            filename,
            bytes,
            cache_status: CacheStatus::Miss,
        })
    }
}

/// A compiled PDF plus the page count the compiler reported for it.
/// Exposed publicly so callers outside the render path (e.g. the
/// `/analyze-pdf` endpoint) can reuse the same compile contract.
pub struct CompiledPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub async fn compile_pdf(source: String) -> Result<CompiledPdf, OrchestratorError> {
    let request = EngineRequest {
        source,
        inputs: Default::default(),
        assets: Default::default(),
        format: EngineFormat::Pdf,
        ppi: None,
    };
    let response = compiler::compile_document(request, COMPILE_TIMEOUT_MS).await?;
    if !response.errors.is_empty() {
        return Err(OrchestratorError::CompileErrors(response.errors));
    }
    let artifact = response
        .artifact
        .ok_or_else(|| OrchestratorError::CompileErrors(Vec::new()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&artifact.data_base64)
        .map_err(|e| {
            OrchestratorError::CompileErrors(vec![compiler::CompileError::new(format!(
                "artifact was not valid base64: {e}"
            ))])
        })?;
    Ok(CompiledPdf {
        bytes,
        page_count: artifact.page_count,
    })
}

/// Resolve a helper and render Typst source for `data`, without
/// touching the cache or single-flight. Used by endpoints that need the
/// rendered markup itself rather than a cached artifact (e.g. the
/// extended PDF analysis endpoint).
pub fn render_source(
    document_type: docgen_types::model::DocumentType,
    template: &str,
    data: Value,
    config: docgen_templates::HelperConfig,
) -> Result<String, OrchestratorError> {
    let helper = docgen_templates::helper_of(document_type, template, data, config)?;
    helper.validate_data()?;
    Ok(helper.render()?)
}

fn build_filename(
    document_type: docgen_types::model::DocumentType,
    data: &Value,
    format: Format,
) -> String {
    let name = data
        .get("personalInfo")
        .map(|p| field_with_fallback(p, "name", &[], "document"))
        .unwrap_or("document");
    format!(
        "{}_{}.{}",
        document_type.as_str(),
        name.replace(' ', "_"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_cache::backend::DisabledBackend;
    use docgen_types::model::DocumentType;
    use serde_json::json;

    fn sample_request(format: Format) -> DocumentRequest {
        DocumentRequest {
            document_type: DocumentType::Resume,
            template: "classic".to_string(),
            format,
            data: json!({
                "personalInfo": {"name": "Ada Lovelace", "email": "ada@example.com"},
                "summary": "Mathematician and writer.",
            }),
            ultra_validation: false,
            spacing_mode: None,
        }
    }

    #[tokio::test]
    async fn docx_requests_bypass_cache_and_never_hit() {
        let cache = Arc::new(DocumentCache::new(Arc::new(DisabledBackend), docgen_cache::DEFAULT_PDF_TTL_SECONDS, docgen_cache::DEFAULT_TYPST_TTL_SECONDS));
        let orchestrator = Orchestrator::new(cache);
        let artifact = orchestrator.render(sample_request(Format::Docx)).await.unwrap();
        assert_eq!(artifact.cache_status, CacheStatus::NotApplicable);
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn typst_format_returns_raw_source_and_populates_cache() {
        let cache = Arc::new(DocumentCache::new(Arc::new(DisabledBackend), docgen_cache::DEFAULT_PDF_TTL_SECONDS, docgen_cache::DEFAULT_TYPST_TTL_SECONDS));
        let orchestrator = Orchestrator::new(cache);
        let artifact = orchestrator.render(sample_request(Format::Typst)).await.unwrap();
        assert_eq!(artifact.cache_status, CacheStatus::Miss);
        let source = String::from_utf8(artifact.bytes).unwrap();
        assert!(source.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn unknown_template_surfaces_as_template_error() {
        let cache = Arc::new(DocumentCache::new(Arc::new(DisabledBackend), docgen_cache::DEFAULT_PDF_TTL_SECONDS, docgen_cache::DEFAULT_TYPST_TTL_SECONDS));
        let orchestrator = Orchestrator::new(cache);
        let mut request = sample_request(Format::Typst);
        request.template = "nonexistent".to_string();
        let err = orchestrator.render(request).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Template(_)));
    }
}
