//! Shared types for the document generation pipeline
//!
//! This crate holds the data model every other crate in the workspace
//! depends on: the request/response shapes, the stable error-code
//! taxonomy, and the low-level escape/fallback helpers the template
//! helpers build on.

pub mod error;
pub mod escape;
pub mod fallback;
pub mod model;

pub use error::{ApiError, ErrorCode};
pub use model::{
    CacheEntry, DocumentRequest, DocumentType, Format, Job, JobState, RateLimitBucket,
    RenderArtifact, SpacingMode, TemplateInfo,
};
