//! Integration tests for Cite Master
//!
//! These tests drive the public API end to end: HTML served over HTTP by a
//! local mock server, extracted, and formatted as citations.

use cite_master::citation::{batch_generate_citations, export_bibliography, generate_citation};
use cite_master::config::{Config, ExtractorConfig};
use cite_master::extract::MetadataExtractor;
use cite_master::mcp::server::McpServer;
use cite_master::models::{CitationRequest, SourceRecord, Style};
use cite_master::{format_citation, CitationError};
use serde_json::json;

const NEWS_ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Ownership Explained - The Systems Gazette</title>
  <meta property="og:title" content="Ownership
      Explained">
  <meta name="author" content="Grace B. Hopper">
  <meta property="article:published_time" content="2022-07-14T09:30:00Z">
</head>
<body><h1>Ownership Explained</h1></body>
</html>"#;

const STRUCTURED_ARTICLE: &str = r#"<html><head>
  <script type="application/ld+json">
  {"@context": "https://schema.org", "@type": "BlogPosting",
   "headline": "Borrowing in Practice",
   "author": {"@type": "Person", "name": "Niklaus Wirth"},
   "datePublished": "2021-01-02",
   "publisher": {"@type": "Organization", "name": "Compiler Weekly"}}
  </script>
</head><body></body></html>"#;

fn extractor() -> MetadataExtractor {
    let config = ExtractorConfig {
        timeout_secs: 5,
        ..Default::default()
    };
    MetadataExtractor::new(&config).expect("extractor should build")
}

#[tokio::test]
async fn test_extract_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/news/ownership")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(NEWS_ARTICLE)
        .create_async()
        .await;

    let url = format!("{}/news/ownership", server.url());
    let metadata = extractor().extract(&url).await.expect("metadata");

    assert_eq!(metadata.title, "Ownership Explained");
    assert_eq!(metadata.author, "Grace B. Hopper");
    assert_eq!(metadata.date, "2022, July 14");
    assert_eq!(metadata.publisher, "127.0.0.1");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_extract_non_success_status_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone")
        .with_status(404)
        .with_body(NEWS_ARTICLE)
        .create_async()
        .await;

    let url = format!("{}/gone", server.url());
    assert!(extractor().extract(&url).await.is_none());
}

#[tokio::test]
async fn test_batch_extract_over_http_keeps_order() {
    let mut server = mockito::Server::new_async().await;
    let _structured = server
        .mock("GET", "/structured")
        .with_status(200)
        .with_body(STRUCTURED_ARTICLE)
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/news")
        .with_status(200)
        .with_body(NEWS_ARTICLE)
        .create_async()
        .await;
    let _error = server
        .mock("GET", "/error")
        .with_status(500)
        .create_async()
        .await;

    let urls = vec![
        format!("{}/structured", server.url()),
        format!("{}/error", server.url()),
        "not-a-url".to_string(),
        format!("{}/news", server.url()),
    ];
    let results = extractor().max_concurrent(2).batch_extract(&urls).await;

    assert_eq!(results.len(), 4);
    for (result, url) in results.iter().zip(&urls) {
        assert_eq!(&result.url, url);
    }
    assert!(results[0].success);
    assert_eq!(
        results[0].metadata.as_ref().unwrap().publisher,
        "Compiler Weekly"
    );
    assert!(!results[1].success);
    assert!(!results[2].success);
    assert!(results[3].success);
}

#[tokio::test]
async fn test_extracted_metadata_to_website_citations() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/post")
        .with_status(200)
        .with_body(STRUCTURED_ARTICLE)
        .create_async()
        .await;

    let url = format!("{}/post", server.url());
    let metadata = extractor().extract(&url).await.expect("metadata");
    let record = SourceRecord::Website(metadata.into_website_fields(url.clone()));

    assert_eq!(
        format_citation(&record, Style::Apa),
        format!(
            "Wirth, N. (2021). Borrowing in practice. Compiler Weekly. {}",
            url
        )
    );
    assert_eq!(
        format_citation(&record, Style::Mla),
        format!(
            "Wirth, Niklaus. \"Borrowing In Practice.\" Compiler Weekly, 02 Jan. 2021, {}.",
            url.trim_start_matches("http://")
        )
    );
}

#[test]
fn test_generate_citation_errors() {
    assert_eq!(
        generate_citation("thesis", "APA", json!({"title": "T"})),
        Err(CitationError::UnsupportedStyleOrType)
    );
    assert!(matches!(
        generate_citation("journal", "MLA", json!({"volume": [1, 2]})),
        Err(CitationError::InvalidFields(_))
    ));
}

#[test]
fn test_batch_generation_is_ordered_and_isolated() {
    let items: Vec<CitationRequest> = serde_json::from_value(json!([
        {"sourceType": "book", "authors": ["Ann Lee"], "title": "Rust", "year": 2020, "publisher": "Acme"},
        {"sourceType": "thesis", "title": "Nope"},
        {"sourceType": "journal", "authors": ["A", "B", "C"], "title": "Paper", "journal": "J", "volume": 3}
    ]))
    .unwrap();

    let results = batch_generate_citations(&items, "APA");
    assert_eq!(results.len(), 3);
    assert!(results[0].success);
    assert_eq!(
        results[0].citation.as_deref(),
        Some("Ann Lee (2020). Rust. Acme.")
    );
    assert!(!results[1].success);
    assert!(results[1].citation.is_none());
    assert!(results[2].success);
    assert_eq!(
        results[2].citation.as_deref(),
        Some("A, B, & C. Paper. J, 3.")
    );
}

#[test]
fn test_bibliography_export() {
    let items = vec![
        CitationRequest::new("website")
            .field("author", "Zed Shaw")
            .field("title", "Last entry"),
        CitationRequest::new("website")
            .field("author", "Ada Lovelace")
            .field("title", "First entry"),
    ];

    assert_eq!(
        export_bibliography(&items, "APA"),
        "Lovelace, A. First entry\n\nShaw, Z. Last entry"
    );
}

#[tokio::test]
async fn test_server_initialization() {
    let server = McpServer::from_config(&Config::default()).expect("Failed to create MCP server");
    assert_eq!(
        server.tool_names(),
        [
            "batch_extract_metadata",
            "batch_generate_citations",
            "citation_rules",
            "extract_metadata",
            "generate_citation",
        ]
    );
}
