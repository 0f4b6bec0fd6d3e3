//! # text-to-pdf – plain text → PDF over HTTP
//!
//! This crate renders plain text plus a handful of formatting parameters
//! into an A4 PDF document. The pipeline stages are:
//!
//! 1. **Validate** – parse and check the parameters ([`request`])
//! 2. **Wrap** – measure glyphs and break lines to the content width ([`fonts`], [`layout`])
//! 3. **Paginate** – flow lines down pages, add "Page i of N" footers ([`pagination`])
//! 4. **Render** – emit PDF bytes with an embedded font via printpdf ([`render`])
//!
//! The HTTP endpoint lives in [`server`].

pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod request;
pub mod server;

// Re-exports for convenience
pub use error::{Error, Result};
pub use fonts::EmbeddedFont;
pub use pipeline::{compute_layout, generate_pdf};
pub use request::{Alignment, GenerationRequest};
