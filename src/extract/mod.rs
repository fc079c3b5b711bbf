//! Metadata extraction from web pages.
//!
//! [`MetadataExtractor`] fetches a document through a [`DocumentFetcher`] and
//! derives `{title, author, date, publisher}` with a per-field cascade:
//!
//! | Field     | Cascade                                                                   |
//! |-----------|---------------------------------------------------------------------------|
//! | title     | JSON-LD `headline`/`name` → `og:title`, `title`, `twitter:title` → `<title>` → `<h1>` |
//! | author    | JSON-LD `author` → `article:author`, `author`, `og:article:author`        |
//! | date      | JSON-LD `datePublished`/`dateCreated` → `article:published_time`, `date`, `<time datetime>` |
//! | publisher | JSON-LD `publisher` → `og:site_name`, `publisher` → title suffix → domain |
//!
//! Every failure (bad URL, network error, non-2xx status, empty document)
//! collapses to `None` for the caller; the cause is logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use cite_master::config::ExtractorConfig;
//! use cite_master::extract::MetadataExtractor;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = MetadataExtractor::new(&ExtractorConfig::default())?;
//! if let Some(metadata) = extractor.extract("https://example.com/article").await {
//!     println!("{} ({})", metadata.title, metadata.publisher);
//! }
//! # Ok(())
//! # }
//! ```

mod html;
pub mod mock;

pub use html::parse_metadata;
pub use mock::MockFetcher;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

use crate::config::ExtractorConfig;
use crate::models::{ExtractedMetadata, ExtractionResult};
use crate::utils::{validate_url, HttpClient, ValidationError};

/// Error reported for a batch slot whose extraction failed
pub const EXTRACTION_FAILED: &str = "Failed to extract metadata";

/// A fetched document: HTTP status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub status: u16,
    pub body: String,
}

impl FetchedDocument {
    /// A 200 response with the given HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can retrieve a document for a URL
#[async_trait]
pub trait DocumentFetcher: Send + Sync + std::fmt::Debug {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, ExtractError>;
}

/// Reasons an extraction produced nothing
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network error, timeout or non-2xx response
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("No metadata found")]
    NoMetadataFound,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::FetchFailed(format!("request timed out: {}", err))
        } else {
            ExtractError::FetchFailed(err.to_string())
        }
    }
}

impl From<ValidationError> for ExtractError {
    fn from(err: ValidationError) -> Self {
        ExtractError::InvalidUrl(err.to_string())
    }
}

/// Fetches pages and derives citation metadata from them
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    fetcher: Arc<dyn DocumentFetcher>,
    max_concurrent: usize,
}

impl MetadataExtractor {
    /// Create an extractor backed by an HTTP client built from `config`
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = HttpClient::from_config(config)?;
        Ok(Self::with_fetcher(Arc::new(client)).max_concurrent(config.max_concurrent_requests))
    }

    /// Create an extractor backed by any fetcher
    pub fn with_fetcher(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            fetcher,
            max_concurrent: ExtractorConfig::default().max_concurrent_requests,
        }
    }

    /// Bound the number of in-flight fetches during batch extraction
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Extract metadata, collapsing every failure to `None`
    pub async fn extract(&self, url: &str) -> Option<ExtractedMetadata> {
        match self.try_extract(url).await {
            Ok(metadata) => {
                tracing::debug!("Extracted metadata from {}: {:?}", url, metadata);
                Some(metadata)
            }
            Err(e) => {
                tracing::warn!("Error extracting metadata from {}: {}", url, e);
                None
            }
        }
    }

    /// Extract metadata, reporting why it failed
    pub async fn try_extract(&self, url: &str) -> Result<ExtractedMetadata, ExtractError> {
        let parsed = validate_url(url)?;
        let document = self.fetcher.fetch(&parsed).await?;

        if !document.is_success() {
            return Err(ExtractError::FetchFailed(format!(
                "request failed with status code: {}",
                document.status
            )));
        }
        if document.body.trim().is_empty() {
            return Err(ExtractError::NoMetadataFound);
        }

        let metadata = parse_metadata(&document.body, &parsed);
        if metadata.is_empty() {
            return Err(ExtractError::NoMetadataFound);
        }

        Ok(metadata)
    }

    /// Extract metadata for every URL.
    ///
    /// Fetches run concurrently up to the configured bound; the returned
    /// results are index-aligned with `urls`.
    pub async fn batch_extract(&self, urls: &[String]) -> Vec<ExtractionResult> {
        tracing::info!(
            "Extracting metadata for {} URLs ({} concurrent)",
            urls.len(),
            self.max_concurrent
        );

        stream::iter(urls.iter().cloned())
            .map(|url| async move {
                match self.extract(&url).await {
                    Some(metadata) => ExtractionResult::ok(url.as_str(), metadata),
                    None => ExtractionResult::failed(url.as_str(), EXTRACTION_FAILED),
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
