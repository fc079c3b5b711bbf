//! The per-field HTML cascade.

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use url::Url;

use crate::models::ExtractedMetadata;
use crate::utils::{collapse_whitespace, parse_loose_date};

/// Separator between an article title and a trailing site name
const TITLE_SITE_SEPARATOR: &str = " - ";

/// Layout for dates read from meta tags
const EXTRACTED_DATE_FORMAT: &str = "%Y, %B %d";

/// Derive citation metadata from an HTML document fetched from `page_url`.
///
/// Each field falls through its own cascade; a broken JSON-LD block only
/// means the structured step yields nothing.
pub fn parse_metadata(html: &str, page_url: &Url) -> ExtractedMetadata {
    let document = Html::parse_document(html);
    let structured = StructuredData::find(&document);
    let structured = structured.as_ref();

    let title = structured
        .and_then(StructuredData::title)
        .or_else(|| {
            meta_content(
                &document,
                &[
                    ("property", "og:title"),
                    ("name", "title"),
                    ("name", "twitter:title"),
                ],
            )
        })
        .or_else(|| element_text(&document, "title"))
        .or_else(|| element_text(&document, "h1"))
        .unwrap_or_default();

    let author = structured
        .and_then(StructuredData::author)
        .or_else(|| {
            meta_content(
                &document,
                &[
                    ("property", "article:author"),
                    ("name", "author"),
                    ("property", "og:article:author"),
                ],
            )
        })
        .unwrap_or_default();

    let date = structured
        .and_then(StructuredData::date)
        .or_else(|| meta_date(&document))
        .unwrap_or_default();

    let publisher = structured
        .and_then(StructuredData::publisher)
        .or_else(|| {
            meta_content(
                &document,
                &[("property", "og:site_name"), ("name", "publisher")],
            )
        })
        .unwrap_or_default();

    let mut metadata = ExtractedMetadata {
        title: collapse_whitespace(&title),
        author: collapse_whitespace(&author),
        date: collapse_whitespace(&date),
        publisher: collapse_whitespace(&publisher),
    };

    if let Some((head, site)) = split_site_suffix(&metadata.title) {
        if metadata.publisher.is_empty() {
            metadata.publisher = site;
        }
        metadata.title = head;
    }

    if metadata.publisher.is_empty() {
        metadata.publisher = domain_name(page_url);
    }

    metadata
}

/// Split "Article Title - Site Name" into the first and last segments
fn split_site_suffix(title: &str) -> Option<(String, String)> {
    let mut parts = title.split(TITLE_SITE_SEPARATOR);
    let head = parts.next()?.trim().to_string();
    let site = parts.last()?.trim().to_string();
    Some((head, site))
}

/// Host of the page URL without a leading "www."
fn domain_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// First non-empty `content` among meta tags matching the `(attribute, key)` pairs, in order
fn meta_content(document: &Html, candidates: &[(&str, &str)]) -> Option<String> {
    candidates.iter().find_map(|(attr, key)| {
        let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, key)).ok()?;
        document
            .select(&selector)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(str::to_string)
    })
}

/// Text of the first element matching `selector` that has any
fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .find(|text| !text.trim().is_empty())
}

/// Publication date from meta tags or a `<time datetime>` element.
///
/// Parseable dates are rewritten as "YYYY, Month DD"; anything else is kept as found.
fn meta_date(document: &Html) -> Option<String> {
    let raw = meta_content(
        document,
        &[("property", "article:published_time"), ("name", "date")],
    )
    .or_else(|| {
        let selector = Selector::parse("time[datetime]").ok()?;
        document
            .select(&selector)
            .filter_map(|time| time.value().attr("datetime"))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    })?;

    match parse_loose_date(&raw) {
        Some(date) => Some(date.format(EXTRACTED_DATE_FORMAT).to_string()),
        None => {
            tracing::debug!("Error parsing date: {}", raw);
            Some(raw)
        }
    }
}

/// The first usable schema.org object embedded as JSON-LD
#[derive(Debug)]
struct StructuredData(Map<String, Value>);

impl StructuredData {
    fn find(document: &Html) -> Option<Self> {
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
        document.select(&selector).find_map(|script| {
            let raw = script.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Self::from_value(value),
                Err(e) => {
                    tracing::debug!("Error parsing JSON-LD: {}", e);
                    None
                }
            }
        })
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.into_iter().next().and_then(Self::from_value),
            Value::Object(mut object) => {
                if let Some(Value::Array(graph)) = object.remove("@graph") {
                    let node = graph
                        .into_iter()
                        .find(|node| node.get("headline").is_some() || node.get("name").is_some());
                    if let Some(node) = node {
                        return Self::from_value(node);
                    }
                }
                Some(Self(object))
            }
            _ => None,
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn title(&self) -> Option<String> {
        self.text("headline").or_else(|| self.text("name"))
    }

    fn date(&self) -> Option<String> {
        self.text("datePublished")
            .or_else(|| self.text("dateCreated"))
    }

    /// First author when a list is given; `.name` of an object, else the value itself
    fn author(&self) -> Option<String> {
        let author = match self.0.get("author")? {
            Value::Array(authors) => authors.first()?,
            other => other,
        };
        display_name(author)
    }

    fn publisher(&self) -> Option<String> {
        display_name(self.0.get("publisher")?)
    }
}

fn display_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::Object(object) => object.get("name").and_then(Value::as_str)?.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => return None,
        other => other.to_string(),
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://www.example.com/posts/1").unwrap()
    }

    #[test]
    fn test_og_title_only() {
        let html = r#"<html><head>
            <meta property="og:title" content="  A   Study of
               Things ">
        </head></html>"#;

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "A Study of Things");
        assert_eq!(metadata.author, "");
        assert_eq!(metadata.date, "");
        assert_eq!(metadata.publisher, "example.com");
    }

    #[test]
    fn test_json_ld_takes_priority() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "NewsArticle", "headline": "Structured Headline",
             "datePublished": "2021-06-01T08:00:00Z",
             "author": [{"@type": "Person", "name": "Ada Lovelace"}, {"name": "Second"}],
             "publisher": {"@type": "Organization", "name": "The Daily"}}
            </script>
            <meta property="og:title" content="Meta Title">
            <meta property="og:site_name" content="Meta Site">
            <meta name="author" content="Meta Author">
        </head></html>"#;

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "Structured Headline");
        assert_eq!(metadata.author, "Ada Lovelace");
        assert_eq!(metadata.date, "2021-06-01T08:00:00Z");
        assert_eq!(metadata.publisher, "The Daily");
    }

    #[test]
    fn test_json_ld_array_graph_and_plain_values() {
        let html = r#"<script type="application/ld+json">
            [{"@graph": [{"@type": "WebSite"}, {"name": "Graph Node", "author": "Plain Author",
              "publisher": "Plain Publisher"}]}]
        </script>"#;

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "Graph Node");
        assert_eq!(metadata.author, "Plain Author");
        assert_eq!(metadata.publisher, "Plain Publisher");
    }

    #[test]
    fn test_broken_json_ld_falls_through() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"headline": </script>
            <title>Fallback Title</title>
            <meta name="author" content="Meta Author">
        </head></html>"#;

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "Fallback Title");
        assert_eq!(metadata.author, "Meta Author");
    }

    #[test]
    fn test_title_suffix_becomes_publisher() {
        let html = "<html><head><title>Deep Dive - Engineering - Acme Blog</title></head></html>";

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "Deep Dive");
        assert_eq!(metadata.publisher, "Acme Blog");
    }

    #[test]
    fn test_title_suffix_does_not_override_publisher() {
        let html = r#"<html><head>
            <title>Deep Dive - Acme Blog</title>
            <meta property="og:site_name" content="Acme">
        </head></html>"#;

        let metadata = parse_metadata(html, &url());
        assert_eq!(metadata.title, "Deep Dive");
        assert_eq!(metadata.publisher, "Acme");
    }

    #[test]
    fn test_h1_fallback() {
        let html = "<html><body><h1>\n  Heading\n  Title </h1></body></html>";
        assert_eq!(parse_metadata(html, &url()).title, "Heading Title");
    }

    #[test]
    fn test_meta_date_is_reformatted() {
        let html = r#"<meta property="article:published_time" content="2020-03-05T10:00:00+00:00">"#;
        assert_eq!(parse_metadata(html, &url()).date, "2020, March 05");

        let html = r#"<body><time datetime="2019-11-30">last year</time></body>"#;
        assert_eq!(parse_metadata(html, &url()).date, "2019, November 30");
    }

    #[test]
    fn test_unparseable_meta_date_is_kept() {
        let html = r#"<meta name="date" content="Spring 2020">"#;
        assert_eq!(parse_metadata(html, &url()).date, "Spring 2020");
    }

    #[test]
    fn test_empty_meta_content_is_skipped() {
        let html = r#"<meta property="og:title" content="  ">
            <meta name="twitter:title" content="Twitter Title">"#;
        assert_eq!(parse_metadata(html, &url()).title, "Twitter Title");
    }
}
