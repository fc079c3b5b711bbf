//! Required-field validation against the rule table.

use serde::{Deserialize, Serialize};

use super::rules::{lookup, StyleRule};
use super::CitationError;
use crate::models::SourceRecord;

/// Outcome of validating a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `record` against the rule for `style` and `source_type`.
///
/// Fails with [`CitationError::UnsupportedStyleOrType`] when no rule exists.
pub fn validate(
    record: &SourceRecord,
    style: &str,
    source_type: &str,
) -> Result<ValidationReport, CitationError> {
    let rule = lookup(style, source_type).ok_or(CitationError::UnsupportedStyleOrType)?;
    Ok(validate_with(rule, record))
}

/// Check every field marked required; optional fields never produce errors
pub fn validate_with(rule: &StyleRule, record: &SourceRecord) -> ValidationReport {
    let errors = rule
        .fields
        .iter()
        .filter(|field| field.is_required() && !record.has_value(field.name))
        .map(|field| format!("Missing required field: {}", field.name))
        .collect();

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::rules::{Constraint, FieldRule, StyleRule};
    use crate::models::{SourceType, Style, WebsiteFields};

    fn strict_rule() -> StyleRule {
        static FIELDS: &[FieldRule] = &[
            FieldRule {
                name: "title",
                lead: "",
                render: |v| v.to_string(),
                constraints: &[Constraint::Required],
            },
            FieldRule {
                name: "url",
                lead: ". ",
                render: |v| v.to_string(),
                constraints: &[Constraint::Required, Constraint::Guideline("Link")],
            },
        ];
        StyleRule {
            style: Style::Apa,
            source_type: SourceType::Website,
            fields: FIELDS,
            terminator: None,
        }
    }

    #[test]
    fn test_built_in_rules_accept_empty_records() {
        let record = SourceRecord::Website(WebsiteFields::default());
        let report = validate(&record, "mla", "website").unwrap();
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_unsupported_combination() {
        let record = SourceRecord::Website(WebsiteFields::default());
        assert_eq!(
            validate(&record, "chicago", "website"),
            Err(CitationError::UnsupportedStyleOrType)
        );
        assert_eq!(
            validate(&record, "APA", "thesis"),
            Err(CitationError::UnsupportedStyleOrType)
        );
    }

    #[test]
    fn test_required_fields_are_enforced() {
        let rule = strict_rule();
        let record = SourceRecord::Website(WebsiteFields {
            title: "Present".to_string(),
            ..Default::default()
        });

        let report = validate_with(&rule, &record);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Missing required field: url"]);
    }
}
