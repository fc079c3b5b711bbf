//! Source records: the typed field shapes a citation is built from.
//!
//! Websites carry a single display-name `author`; books and journals carry an
//! ordered `authors` list. The two shapes are separate variants of
//! [`SourceRecord`] rather than one loosely-typed map.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Citation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// APA 7th edition
    #[serde(rename = "APA")]
    Apa,
    /// MLA 9th edition
    #[serde(rename = "MLA")]
    Mla,
}

impl Style {
    /// All built-in styles
    pub const ALL: [Style; 2] = [Style::Apa, Style::Mla];

    /// Canonical upper-case name ("APA", "MLA")
    pub fn name(&self) -> &'static str {
        match self {
            Style::Apa => "APA",
            Style::Mla => "MLA",
        }
    }
}

impl FromStr for Style {
    type Err = String;

    /// Case-insensitive: "apa", "Apa" and "APA" are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "APA" => Ok(Style::Apa),
            "MLA" => Ok(Style::Mla),
            other => Err(format!("unknown citation style: {}", other)),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The category of cited work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Website,
    Book,
    Journal,
}

impl SourceType {
    /// All built-in source types
    pub const ALL: [SourceType; 3] = [SourceType::Website, SourceType::Book, SourceType::Journal];

    /// Wire identifier ("website", "book", "journal")
    pub fn id(&self) -> &'static str {
        match self {
            SourceType::Website => "website",
            SourceType::Book => "book",
            SourceType::Journal => "journal",
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(SourceType::Website),
            "book" => Ok(SourceType::Book),
            "journal" => Ok(SourceType::Journal),
            other => Err(format!("unknown source type: {}", other)),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Fields of a website citation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteFields {
    /// Author display name ("Jane Q. Public")
    #[serde(default, deserialize_with = "text_or_number")]
    pub author: String,

    /// Publication date, any loosely formatted date string
    #[serde(default, deserialize_with = "text_or_number")]
    pub date: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,

    /// Site name or organization
    #[serde(default, deserialize_with = "text_or_number")]
    pub publisher: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub url: String,
}

/// Fields of a book citation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    /// Authors in citation order, already in the form they should be printed
    #[serde(default, deserialize_with = "author_list")]
    pub authors: Vec<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,

    /// Bare publication year
    #[serde(default, deserialize_with = "text_or_number")]
    pub year: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub publisher: String,
}

/// Fields of a journal article citation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalFields {
    #[serde(default, deserialize_with = "author_list")]
    pub authors: Vec<String>,

    /// Article title
    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,

    /// Journal name
    #[serde(default, deserialize_with = "text_or_number")]
    pub journal: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub volume: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub issue: String,

    #[serde(default, deserialize_with = "text_or_number")]
    pub year: String,

    /// Page range ("45-67")
    #[serde(default, deserialize_with = "text_or_number")]
    pub pages: String,

    /// Bare DOI or a doi.org link
    #[serde(default, deserialize_with = "text_or_number")]
    pub doi: String,
}

/// A normalized citation input, one variant per source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Website(WebsiteFields),
    Book(BookFields),
    Journal(JournalFields),
}

impl SourceRecord {
    /// Build the record for `source_type` from a JSON field map
    pub fn from_fields(
        source_type: SourceType,
        fields: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match source_type {
            SourceType::Website => SourceRecord::Website(serde_json::from_value(fields)?),
            SourceType::Book => SourceRecord::Book(serde_json::from_value(fields)?),
            SourceType::Journal => SourceRecord::Journal(serde_json::from_value(fields)?),
        })
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            SourceRecord::Website(_) => SourceType::Website,
            SourceRecord::Book(_) => SourceType::Book,
            SourceRecord::Journal(_) => SourceType::Journal,
        }
    }

    /// Whether the named rule slot has a non-blank value.
    ///
    /// Derived MLA slots answer for the inputs they are built from:
    /// `container` for `publisher`, `location` for `url`.
    pub fn has_value(&self, field: &str) -> bool {
        let present = |s: &str| !s.trim().is_empty();
        match self {
            SourceRecord::Website(w) => match field {
                "author" => present(&w.author),
                "date" => present(&w.date),
                "title" => present(&w.title),
                "publisher" | "container" => present(&w.publisher),
                "url" | "location" => present(&w.url),
                _ => false,
            },
            SourceRecord::Book(b) => match field {
                "authors" => !b.authors.is_empty(),
                "title" => present(&b.title),
                "year" => present(&b.year),
                "publisher" => present(&b.publisher),
                _ => false,
            },
            SourceRecord::Journal(j) => match field {
                "authors" => !j.authors.is_empty(),
                "title" => present(&j.title),
                "journal" => present(&j.journal),
                "volume" => present(&j.volume),
                "issue" => present(&j.issue),
                "year" => present(&j.year),
                "pages" => present(&j.pages),
                "doi" => present(&j.doi),
                _ => false,
            },
        }
    }
}

impl From<WebsiteFields> for SourceRecord {
    fn from(fields: WebsiteFields) -> Self {
        SourceRecord::Website(fields)
    }
}

impl From<BookFields> for SourceRecord {
    fn from(fields: BookFields) -> Self {
        SourceRecord::Book(fields)
    }
}

impl From<JournalFields> for SourceRecord {
    fn from(fields: JournalFields) -> Self {
        SourceRecord::Journal(fields)
    }
}

/// A citation request as it arrives from a caller.
///
/// ```json
/// {"sourceType": "journal", "style": "APA", "authors": ["A", "B"], "year": 2020}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationRequest {
    /// "website", "book" or "journal"
    pub source_type: String,

    /// Style name; batch requests use the batch-wide style instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Remaining source fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl CitationRequest {
    pub fn new(source_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            style: None,
            fields: serde_json::Map::new(),
        }
    }

    /// Set the style
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set one source field
    pub fn field(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

/// Accept a string, a number, or null for a text field
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Accept a list of names or a single name; blank entries are dropped
fn author_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let names = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::One(name)) => vec![name],
        Some(Raw::Many(names)) => names,
        None => Vec::new(),
    };

    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_parse_is_case_insensitive() {
        assert_eq!("apa".parse::<Style>().unwrap(), Style::Apa);
        assert_eq!(" Mla ".parse::<Style>().unwrap(), Style::Mla);
        assert!("chicago".parse::<Style>().is_err());
    }

    #[test]
    fn test_source_type_parse() {
        assert_eq!("journal".parse::<SourceType>().unwrap(), SourceType::Journal);
        assert!("thesis".parse::<SourceType>().is_err());
    }

    #[test]
    fn test_book_fields_accept_numbers_and_drop_blank_authors() {
        let record = SourceRecord::from_fields(
            SourceType::Book,
            json!({"authors": ["Ann Lee", "  ", ""], "title": "Rust", "year": 2021}),
        )
        .unwrap();

        match record {
            SourceRecord::Book(book) => {
                assert_eq!(book.authors, vec!["Ann Lee"]);
                assert_eq!(book.year, "2021");
                assert_eq!(book.publisher, "");
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_journal_single_author_string() {
        let record = SourceRecord::from_fields(
            SourceType::Journal,
            json!({"authors": "Solo Writer", "volume": 12, "issue": null}),
        )
        .unwrap();

        match record {
            SourceRecord::Journal(journal) => {
                assert_eq!(journal.authors, vec!["Solo Writer"]);
                assert_eq!(journal.volume, "12");
                assert_eq!(journal.issue, "");
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_has_value_maps_derived_slots() {
        let record = SourceRecord::Website(WebsiteFields {
            publisher: "Example".to_string(),
            ..Default::default()
        });
        assert!(record.has_value("container"));
        assert!(!record.has_value("location"));
        assert!(!record.has_value("nonexistent"));
    }

    #[test]
    fn test_citation_request_flattens_fields() {
        let request: CitationRequest = serde_json::from_value(json!({
            "sourceType": "website",
            "style": "MLA",
            "title": "Hello",
            "url": "https://example.com"
        }))
        .unwrap();

        assert_eq!(request.source_type, "website");
        assert_eq!(request.style.as_deref(), Some("MLA"));
        assert_eq!(request.fields.get("title"), Some(&json!("Hello")));
        assert!(!request.fields.contains_key("sourceType"));
    }
}
