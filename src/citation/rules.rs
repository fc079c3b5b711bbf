//! The citation rule table.
//!
//! One [`StyleRule`] per (style, source type). A rule lists its fields in
//! rendering order; each field knows the separator that precedes it, how to
//! wrap a non-empty value, and the guidelines that document it. Field order
//! and field rules are the same slice, so they cannot drift apart.

use serde::Serialize;

use crate::models::{SourceType, Style};

use Constraint::Guideline;

/// A constraint attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "text")]
pub enum Constraint {
    /// The field must have a value for the citation to validate
    Required,
    /// Style guidance shown to users, not enforced
    Guideline(&'static str),
}

/// How one field renders
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    /// Separator placed before the field when something precedes it
    pub lead: &'static str,
    pub(crate) render: fn(&str) -> String,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    /// Render `value`; a blank value renders as the empty string
    pub fn apply(&self, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            String::new()
        } else {
            (self.render)(value)
        }
    }

    /// Whether the field must be present for the citation to validate
    pub fn is_required(&self) -> bool {
        self.constraints.contains(&Constraint::Required)
    }

    /// Free-text formatting guidance attached to the field
    pub fn guidelines(&self) -> impl Iterator<Item = &'static str> {
        self.constraints.iter().filter_map(|c| match c {
            Constraint::Guideline(text) => Some(*text),
            Constraint::Required => None,
        })
    }
}

/// Rendering rules for one (style, source type) pair
#[derive(Debug, Clone, Copy)]
pub struct StyleRule {
    pub style: Style,
    pub source_type: SourceType,
    /// Fields in rendering order
    pub fields: &'static [FieldRule],
    /// Closing punctuation, added unless the citation already ends in some
    pub terminator: Option<char>,
}

impl StyleRule {
    /// Field names in rendering order
    pub fn field_order(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Find a field rule by name
    pub fn field(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn plain(value: &str) -> String {
    value.to_string()
}

fn parenthesized(value: &str) -> String {
    format!("({})", value)
}

/// `"Title."`, keeping a title's own `?` or `!` inside the quotes
fn quoted(value: &str) -> String {
    if value.ends_with(&['.', '?', '!'][..]) {
        format!("\"{}\"", value)
    } else {
        format!("\"{}.\"", value)
    }
}

fn page_range(value: &str) -> String {
    format!("pp. {}", value)
}

fn doi_link(value: &str) -> String {
    format!("https://doi.org/{}", value)
}

const fn field(
    name: &'static str,
    lead: &'static str,
    render: fn(&str) -> String,
    constraints: &'static [Constraint],
) -> FieldRule {
    FieldRule {
        name,
        lead,
        render,
        constraints,
    }
}

const APA_WEBSITE: &[FieldRule] = &[
    field(
        "author",
        "",
        plain,
        &[
            Guideline("Use last name, followed by initials"),
            Guideline("For multiple authors, use & before the last author"),
        ],
    ),
    field(
        "date",
        ". ",
        parenthesized,
        &[
            Guideline("Use year of publication"),
            Guideline("For periodically updated sources, include retrieval date"),
        ],
    ),
    field(
        "title",
        ". ",
        plain,
        &[
            Guideline("Capitalize only the first word of title and subtitle"),
            Guideline("Do not italicize or use quotation marks"),
        ],
    ),
    field(
        "publisher",
        ". ",
        plain,
        &[
            Guideline("Include site name if different from author"),
            Guideline("Omit publisher if same as author"),
        ],
    ),
    field(
        "url",
        ". ",
        plain,
        &[
            Guideline("Include complete URL or DOI"),
            Guideline("Do not end with a period"),
        ],
    ),
];

const MLA_WEBSITE: &[FieldRule] = &[
    field(
        "author",
        "",
        plain,
        &[
            Guideline("Start with author's last name, followed by first name"),
            Guideline("If no author, start with title"),
        ],
    ),
    field(
        "title",
        ". ",
        quoted,
        &[
            Guideline("Use quotation marks around article/page titles"),
            Guideline("Capitalize all major words"),
        ],
    ),
    field(
        "container",
        ". ",
        plain,
        &[Guideline("Include website name in italics")],
    ),
    field(
        "publisher",
        ", ",
        plain,
        &[
            Guideline("Include organization responsible for the site"),
            Guideline("Omit if same as website name"),
        ],
    ),
    field(
        "date",
        ", ",
        plain,
        &[
            Guideline("Use day month year format"),
            Guideline("Abbreviate months"),
        ],
    ),
    field(
        "location",
        ", ",
        plain,
        &[Guideline("Include full URL without \"https://\"")],
    ),
];

const APA_BOOK: &[FieldRule] = &[
    field(
        "authors",
        "",
        plain,
        &[Guideline("Use & before the last author")],
    ),
    field("year", " ", parenthesized, &[Guideline("Year in parentheses")]),
    field(
        "title",
        ". ",
        plain,
        &[Guideline("Italicize the title; capitalize only the first word")],
    ),
    field("publisher", ". ", plain, &[Guideline("End with a period")]),
];

const MLA_BOOK: &[FieldRule] = &[
    field(
        "authors",
        "",
        plain,
        &[Guideline("Use and before the last author")],
    ),
    field(
        "title",
        ". ",
        plain,
        &[Guideline("Italicize the title; capitalize all major words")],
    ),
    field("publisher", ". ", plain, &[Guideline("Omit if unknown")]),
    field("year", ", ", plain, &[Guideline("End with a period")]),
];

const APA_JOURNAL: &[FieldRule] = &[
    field(
        "authors",
        "",
        plain,
        &[Guideline("Use & before the last author")],
    ),
    field("year", ". ", parenthesized, &[Guideline("Year in parentheses")]),
    field(
        "title",
        ". ",
        plain,
        &[Guideline("Capitalize only the first word of the article title")],
    ),
    field(
        "journal",
        ". ",
        plain,
        &[Guideline("Italicize the journal name")],
    ),
    field(
        "volume",
        ", ",
        plain,
        &[Guideline("Issue in parentheses directly after the volume")],
    ),
    field("pages", ", ", plain, &[Guideline("Page range without \"pp.\"")]),
    field(
        "doi",
        ". ",
        doi_link,
        &[Guideline("Give the DOI as a https://doi.org/ link")],
    ),
];

const MLA_JOURNAL: &[FieldRule] = &[
    field(
        "authors",
        "",
        plain,
        &[Guideline("Use and before the last author")],
    ),
    field(
        "title",
        ". ",
        quoted,
        &[Guideline("Use quotation marks around the article title")],
    ),
    field(
        "journal",
        ". ",
        plain,
        &[Guideline("Italicize the journal name")],
    ),
    field(
        "volume",
        ", ",
        plain,
        &[Guideline("Write vol. and no. before the numbers")],
    ),
    field("year", ", ", plain, &[Guideline("Use year of publication")]),
    field("pages", ", ", page_range, &[Guideline("Prefix pages with pp.")]),
    field(
        "doi",
        ", ",
        doi_link,
        &[Guideline("End with the DOI and a period")],
    ),
];

/// Every built-in rule
pub static RULES: &[StyleRule] = &[
    StyleRule {
        style: Style::Apa,
        source_type: SourceType::Website,
        fields: APA_WEBSITE,
        terminator: None,
    },
    StyleRule {
        style: Style::Mla,
        source_type: SourceType::Website,
        fields: MLA_WEBSITE,
        terminator: Some('.'),
    },
    StyleRule {
        style: Style::Apa,
        source_type: SourceType::Book,
        fields: APA_BOOK,
        terminator: Some('.'),
    },
    StyleRule {
        style: Style::Mla,
        source_type: SourceType::Book,
        fields: MLA_BOOK,
        terminator: Some('.'),
    },
    StyleRule {
        style: Style::Apa,
        source_type: SourceType::Journal,
        fields: APA_JOURNAL,
        terminator: Some('.'),
    },
    StyleRule {
        style: Style::Mla,
        source_type: SourceType::Journal,
        fields: MLA_JOURNAL,
        terminator: Some('.'),
    },
];

/// The rule for a style and source type, if one is defined
pub fn rule_for(style: Style, source_type: SourceType) -> Option<&'static StyleRule> {
    RULES
        .iter()
        .find(|r| r.style == style && r.source_type == source_type)
}

/// Look up a rule by name; the style is matched case-insensitively
pub fn lookup(style: &str, source_type: &str) -> Option<&'static StyleRule> {
    let style = style.parse::<Style>().ok()?;
    let source_type = source_type.parse::<SourceType>().ok()?;
    rule_for(style, source_type)
}
