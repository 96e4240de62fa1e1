//! Registry introspection: `/templates`, `/templates/{doc_type}`,
//! `/template-info/{doc_type}/{name}`, `/schema/{doc_type}`.

use axum::extract::Path;
use axum::Json;
use docgen_types::model::TemplateInfo;
use serde_json::{json, Value};

use super::parse_document_type;
use crate::error::AppError;

pub async fn list_all() -> Json<Value> {
    let all = docgen_templates::list(None);
    Json(json!({ "templates": all }))
}

pub async fn list_for_type(Path(doc_type): Path<String>) -> Result<Json<Value>, AppError> {
    let document_type = parse_document_type(&doc_type)?;
    let templates = docgen_templates::list(Some(document_type));
    Ok(Json(json!({ "documentType": document_type.as_str(), "templates": templates })))
}

pub async fn template_info(
    Path((doc_type, name)): Path<(String, String)>,
) -> Result<Json<TemplateInfo>, AppError> {
    let document_type = parse_document_type(&doc_type)?;
    let info = docgen_templates::get(document_type, &name)?;
    Ok(Json(info))
}

pub async fn schema(Path(doc_type): Path<String>) -> Result<Json<Value>, AppError> {
    let document_type = parse_document_type(&doc_type)?;
    Ok(Json(docgen_templates::sample_data(document_type)))
}
