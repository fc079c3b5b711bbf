//! # Cite Master
//!
//! Extract bibliographic metadata from web pages and format citations in APA
//! and MLA for websites, books and journal articles.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SourceRecord, CitationRequest, results)
//! - [`citation`]: Rule table, validation and formatting
//! - [`extract`]: Metadata extraction from HTML pages
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: HTTP client, date parsing and text helpers
//! - [`config`]: Configuration management

pub mod citation;
pub mod config;
pub mod extract;
pub mod mcp;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use citation::{
    batch_generate_citations, export_bibliography, format_citation, generate_citation,
    CitationError,
};
pub use extract::{ExtractError, MetadataExtractor};
pub use models::{SourceRecord, SourceType, Style};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
