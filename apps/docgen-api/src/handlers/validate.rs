//! `POST /validate` — run the validator without rendering anything.

use axum::Json;
use docgen_types::model::DocumentType;
use docgen_validate::{validate_standard, validate_ultra};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub document_type: DocumentType,
    pub data: Value,
    #[serde(default)]
    pub ultra_validation: bool,
}

pub async fn validate(Json(request): Json<ValidateRequest>) -> Result<Json<Value>, AppError> {
    if request.ultra_validation {
        let (normalized, issues) = validate_ultra(request.document_type, &request.data, false)?;
        Ok(Json(json!({
            "valid": true,
            "data": normalized,
            "warnings": issues.iter().map(|i| json!({
                "code": i.code.code(),
                "field": i.field,
                "message": i.message,
            })).collect::<Vec<_>>(),
        })))
    } else {
        let normalized = validate_standard(request.document_type, &request.data)?;
        Ok(Json(json!({ "valid": true, "data": normalized })))
    }
}
