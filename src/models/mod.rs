//! Core data models for citation requests, source records and extraction results.

mod metadata;
mod record;

pub use metadata::{CitationResult, ExtractedMetadata, ExtractionResult, GeneratedCitation};
pub use record::{
    BookFields, CitationRequest, JournalFields, SourceRecord, SourceType, Style, WebsiteFields,
};
