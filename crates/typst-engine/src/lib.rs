//! Typst document rendering engine
//!
//! Provides the compile contract described by the rendering pipeline:
//! given Typst source text, injected `sys.inputs`, and optional binary
//! assets, compile to PDF/SVG/PNG bytes with a bounded timeout. The
//! compiler is treated as a process-wide singleton — font loading is
//! the expensive part and happens once, lazily, behind a `OnceLock`.

pub mod compiler;
pub mod world;

pub use compiler::{RenderRequest, RenderResponse};
