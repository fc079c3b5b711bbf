//! Citation generation.
//!
//! The pipeline for one item is: parse the source type, build the typed
//! [`SourceRecord`], resolve the [`StyleRule`](rules::StyleRule), validate,
//! then render.
//!
//! An unknown source type or malformed fields are errors. An unknown style is
//! not: it yields the [`UNSUPPORTED_CITATION`] sentinel as the citation text,
//! which batch callers turn into a failed slot.
//!
//! # Example
//!
//! ```rust
//! use cite_master::citation::generate_citation;
//! use serde_json::json;
//!
//! let generated = generate_citation(
//!     "journal",
//!     "APA",
//!     json!({"authors": ["A", "B", "C"], "title": "T", "journal": "J", "year": 2020}),
//! )
//! .unwrap();
//! assert_eq!(generated.citation, "A, B, & C. (2020). T. J.");
//! ```

mod format;
pub mod rules;
mod validate;

pub use format::{invert_name, join_authors, NO_AUTHOR};
pub use validate::{validate, validate_with, ValidationReport};

use serde::Serialize;

use crate::models::{
    CitationRequest, CitationResult, GeneratedCitation, SourceRecord, SourceType, Style,
};
use rules::{lookup, rule_for};

/// Citation text returned for a style with no rules
pub const UNSUPPORTED_CITATION: &str = "Citation style not supported";

/// Error reported for a batch slot that produced the sentinel
pub const GENERATION_FAILED: &str = "Failed to generate citation";

/// Citation generation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CitationError {
    #[error("Unsupported citation style or source type")]
    UnsupportedStyleOrType,

    #[error("{}", .0.join("; "))]
    MissingRequiredField(Vec<String>),

    #[error("Invalid citation fields: {0}")]
    InvalidFields(String),
}

impl From<serde_json::Error> for CitationError {
    fn from(err: serde_json::Error) -> Self {
        CitationError::InvalidFields(err.to_string())
    }
}

/// Format a typed record; the sentinel is returned when no rule matches
pub fn format_citation(record: &SourceRecord, style: Style) -> String {
    match rule_for(style, record.source_type()) {
        Some(rule) => format::render(rule, record),
        None => UNSUPPORTED_CITATION.to_string(),
    }
}

/// Generate one citation from an untyped field map
pub fn generate_citation(
    source_type: &str,
    style: &str,
    fields: serde_json::Value,
) -> Result<GeneratedCitation, CitationError> {
    let kind = source_type
        .parse::<SourceType>()
        .map_err(|_| CitationError::UnsupportedStyleOrType)?;
    let record = SourceRecord::from_fields(kind, fields)?;

    let Some(rule) = lookup(style, source_type) else {
        tracing::warn!("No citation rules for style {:?} and {}", style, kind);
        return Ok(GeneratedCitation {
            citation: UNSUPPORTED_CITATION.to_string(),
            style: style.to_string(),
            source_type: kind.id().to_string(),
        });
    };

    let report = validate_with(rule, &record);
    if !report.valid {
        return Err(CitationError::MissingRequiredField(report.errors));
    }

    Ok(GeneratedCitation {
        citation: format::render(rule, &record),
        style: rule.style.name().to_string(),
        source_type: kind.id().to_string(),
    })
}

/// Generate citations for every item with one style.
///
/// Each slot succeeds or fails on its own; the result is index-aligned with
/// `items`.
pub fn batch_generate_citations(items: &[CitationRequest], style: &str) -> Vec<CitationResult> {
    tracing::info!("Generating {} citations in style {}", items.len(), style);

    items
        .iter()
        .map(|item| {
            let fields = serde_json::Value::Object(item.fields.clone());
            match generate_citation(&item.source_type, style, fields) {
                Ok(generated) if generated.citation == UNSUPPORTED_CITATION => {
                    CitationResult::failed(GENERATION_FAILED)
                }
                Ok(generated) => CitationResult::ok(generated.citation),
                Err(e) => {
                    tracing::debug!("Citation for {} failed: {}", item.source_type, e);
                    CitationResult::failed(e.to_string())
                }
            }
        })
        .collect()
}

/// Format every item and join the successes into a sorted bibliography
pub fn export_bibliography(items: &[CitationRequest], style: &str) -> String {
    let mut entries: Vec<String> = batch_generate_citations(items, style)
        .into_iter()
        .filter_map(|result| result.citation)
        .filter(|citation| !citation.is_empty())
        .collect();

    entries.sort_by_key(|entry| entry.to_lowercase());
    entries.join("\n\n")
}

/// Documentation for one rule field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    pub required: bool,
    pub guidelines: Vec<String>,
}

/// Documentation for a (style, source type) rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescription {
    pub style: String,
    pub source_type: String,
    pub field_order: Vec<String>,
    pub fields: Vec<FieldDescription>,
}

/// Describe the rule for `style` and `source_type`
pub fn describe_rules(style: &str, source_type: &str) -> Result<RuleDescription, CitationError> {
    let rule = lookup(style, source_type).ok_or(CitationError::UnsupportedStyleOrType)?;

    Ok(RuleDescription {
        style: rule.style.name().to_string(),
        source_type: rule.source_type.id().to_string(),
        field_order: rule.field_order().into_iter().map(String::from).collect(),
        fields: rule
            .fields
            .iter()
            .map(|field| FieldDescription {
                name: field.name.to_string(),
                required: field.is_required(),
                guidelines: field.guidelines().map(String::from).collect(),
            })
            .collect(),
    })
}
