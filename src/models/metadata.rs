//! Extraction and citation result models.

use serde::{Deserialize, Serialize};

use super::record::WebsiteFields;

/// Metadata derived from a web page.
///
/// All four fields are always present; an empty string means the value is
/// unknown and should be filled in by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub author: String,
    pub date: String,
    pub publisher: String,
}

impl ExtractedMetadata {
    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.date.is_empty()
            && self.publisher.is_empty()
    }

    /// Turn the extracted metadata into website citation fields for `url`
    pub fn into_website_fields(self, url: impl Into<String>) -> WebsiteFields {
        WebsiteFields {
            author: self.author,
            date: self.date,
            title: self.title,
            publisher: self.publisher,
            url: url.into(),
        }
    }
}

/// One slot of a batch extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExtractedMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub success: bool,
}

impl ExtractionResult {
    pub fn ok(url: impl Into<String>, metadata: ExtractedMetadata) -> Self {
        Self {
            url: url.into(),
            metadata: Some(metadata),
            error: None,
            success: true,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            metadata: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

/// A generated citation with the style and source type it was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCitation {
    pub citation: String,
    pub style: String,
    pub source_type: String,
}

/// One slot of a batch citation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub success: bool,
}

impl CitationResult {
    pub fn ok(citation: impl Into<String>) -> Self {
        Self {
            citation: Some(citation.into()),
            error: None,
            success: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            citation: None,
            error: Some(error.into()),
            success: false,
        }
    }
}
