pub mod analyze;
pub mod generate;
pub mod jobs;
pub mod misc;
pub mod templates;
pub mod validate;

use crate::error::AppError;
use docgen_types::model::DocumentType;
use std::str::FromStr;

pub(crate) fn parse_document_type(raw: &str) -> Result<DocumentType, AppError> {
    DocumentType::from_str(raw).map_err(|message| AppError::InvalidParameter {
        name: "document_type".to_string(),
        message,
    })
}
