//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::{DocumentFetcher, ExtractError, FetchedDocument};

/// A fetcher that serves predefined documents without touching the network.
///
/// Unknown URLs fail the way an unreachable host would.
#[derive(Debug, Default, Clone)]
pub struct MockFetcher {
    documents: HashMap<String, FetchedDocument>,
    delays: HashMap<String, Duration>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with status 200 for `url`
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.documents
            .insert(normalize(url), FetchedDocument::html(html));
        self
    }

    /// Answer `url` with an empty body and the given status
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.documents.insert(
            normalize(url),
            FetchedDocument {
                status,
                body: String::new(),
            },
        );
        self
    }

    /// Hold the response for `url` back by `delay`
    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(normalize(url), delay);
        self
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, ExtractError> {
        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }

        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ExtractError::FetchFailed(format!("connection refused: {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_serves_registered_pages_only() {
        let fetcher = MockFetcher::new().page("https://example.com", "<html></html>");

        let hit = tokio_test::block_on(fetcher.fetch(&Url::parse("https://example.com/").unwrap()));
        assert_eq!(hit.unwrap().status, 200);

        let miss = tokio_test::block_on(fetcher.fetch(&Url::parse("https://other.com/").unwrap()));
        assert!(matches!(miss, Err(ExtractError::FetchFailed(_))));
    }
}
