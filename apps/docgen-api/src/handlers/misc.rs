//! `/`, `/health`, `/metrics` — service-level endpoints with no
//! document-specific logic.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

pub async fn banner() -> Json<Value> {
    Json(json!({
        "service": "docgen-api",
        "description": "Renders résumés and cover letters to PDF, Typst source, or DOCX.",
        "endpoints": [
            "/health", "/metrics", "/templates", "/templates/{doc_type}",
            "/template-info/{doc_type}/{name}", "/schema/{doc_type}",
            "/validate", "/generate", "/generate-yaml", "/generate/async",
            "/jobs/{id}", "/jobs/{id}/download", "/analyze", "/analyze-pdf",
        ],
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "compilerReady": state.compiler_ready(),
        "cache": {
            "connected": state.cache.is_connected(),
        },
    }))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.cache.metrics();
    let total = snapshot.hits + snapshot.misses;
    let hit_rate = if total == 0 {
        0.0
    } else {
        snapshot.hits as f64 / total as f64
    };

    Json(json!({
        "cache": {
            "hits": snapshot.hits,
            "misses": snapshot.misses,
            "total": total,
            "hitRate": hit_rate,
            // Backend failures degrade a get/set to a miss/no-op rather
            // than surfacing as a distinct error — see DESIGN.md.
            "errors": 0,
            "connected": state.cache.is_connected(),
        },
    }))
}
