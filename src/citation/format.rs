//! Field transforms and citation assembly.

use std::collections::HashMap;

use super::rules::StyleRule;
use crate::models::{BookFields, JournalFields, SourceRecord, Style, WebsiteFields};
use crate::utils::{clean_doi, parse_loose_date, sentence_case, strip_url_scheme, title_case};

/// Placeholder for a journal article without authors
pub const NO_AUTHOR: &str = "No author";

const CLOSING_QUOTES: &[char] = &['"', '\u{201D}'];
const TERMINAL_PUNCTUATION: &[char] = &['.', '?', '!'];

/// Render `record` with `rule`.
///
/// The record is turned into the rule's display slots first, then every
/// non-empty slot is joined in field order.
pub fn render(rule: &StyleRule, record: &SourceRecord) -> String {
    let slots = prepare(record, rule.style);
    assemble(rule, &slots)
}

/// Apply the style's field transforms, yielding one display value per slot
pub fn prepare(record: &SourceRecord, style: Style) -> HashMap<&'static str, String> {
    match record {
        SourceRecord::Website(fields) => website_slots(fields, style),
        SourceRecord::Book(fields) => book_slots(fields, style),
        SourceRecord::Journal(fields) => journal_slots(fields, style),
    }
}

fn website_slots(fields: &WebsiteFields, style: Style) -> HashMap<&'static str, String> {
    let mut slots = HashMap::new();
    let author = invert_name(&fields.author, style);
    let date = website_date(&fields.date, style);
    let title = fields.title.trim();

    match style {
        Style::Apa => {
            slots.insert("author", author);
            slots.insert("date", date);
            slots.insert("title", sentence_case(title));
            slots.insert("publisher", fields.publisher.trim().to_string());
            slots.insert("url", fields.url.trim().to_string());
        }
        Style::Mla => {
            let container = fields.publisher.trim().to_string();
            slots.insert("author", author);
            slots.insert("title", title_case(title));
            // publisher is only shown when it differs from the website name
            slots.insert("publisher", String::new());
            slots.insert("container", container);
            slots.insert("date", date);
            slots.insert("location", strip_url_scheme(fields.url.trim()).to_string());
        }
    }

    slots
}

fn book_slots(fields: &BookFields, style: Style) -> HashMap<&'static str, String> {
    HashMap::from([
        ("authors", join_authors(&fields.authors, style)),
        ("title", fields.title.trim().to_string()),
        ("year", fields.year.trim().to_string()),
        ("publisher", fields.publisher.trim().to_string()),
    ])
}

fn journal_slots(fields: &JournalFields, style: Style) -> HashMap<&'static str, String> {
    let authors = if fields.authors.is_empty() {
        NO_AUTHOR.to_string()
    } else {
        join_authors(&fields.authors, style)
    };

    HashMap::from([
        ("authors", authors),
        ("title", fields.title.trim().to_string()),
        ("journal", fields.journal.trim().to_string()),
        ("volume", volume_issue(&fields.volume, &fields.issue, style)),
        ("year", fields.year.trim().to_string()),
        ("pages", fields.pages.trim().to_string()),
        ("doi", clean_doi(&fields.doi).to_string()),
    ])
}

/// Invert a display name: `Last, F. M.` for APA, `Last, First Middle` for MLA.
///
/// Single-token names are returned unchanged.
pub fn invert_name(name: &str, style: Style) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let Some((last, given)) = tokens.split_last() else {
        return String::new();
    };
    if given.is_empty() {
        return last.to_string();
    }

    let given = match style {
        Style::Apa => given
            .iter()
            .filter_map(|token| token.chars().next())
            .map(|initial| format!("{}.", initial))
            .collect::<Vec<_>>()
            .join(" "),
        Style::Mla => given.join(" "),
    };

    format!("{}, {}", last, given)
}

/// Join an author list: `A & B` / `A, B, & C` for APA, `and` for MLA
pub fn join_authors(authors: &[String], style: Style) -> String {
    let conjunction = match style {
        Style::Apa => "&",
        Style::Mla => "and",
    };

    match authors {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} {} {}", first, conjunction, second),
        [rest @ .., last] => format!("{}, {} {}", rest.join(", "), conjunction, last),
    }
}

/// Year for APA, `DD Mon. YYYY` for MLA; unparseable dates pass through
fn website_date(raw: &str, style: Style) -> String {
    let raw = raw.trim();
    match parse_loose_date(raw) {
        Some(date) => match style {
            Style::Apa => date.format("%Y").to_string(),
            Style::Mla => date.format("%d %b. %Y").to_string(),
        },
        None => raw.to_string(),
    }
}

/// `V(I)` for APA, `vol. V, no. I` for MLA; an issue needs a volume
fn volume_issue(volume: &str, issue: &str, style: Style) -> String {
    let (volume, issue) = (volume.trim(), issue.trim());
    if volume.is_empty() {
        return String::new();
    }

    match (style, issue.is_empty()) {
        (Style::Apa, true) => volume.to_string(),
        (Style::Apa, false) => format!("{}({})", volume, issue),
        (Style::Mla, true) => format!("vol. {}", volume),
        (Style::Mla, false) => format!("vol. {}, no. {}", volume, issue),
    }
}

/// Join the rendered slots in field order
pub fn assemble(rule: &StyleRule, slots: &HashMap<&'static str, String>) -> String {
    let mut out = String::new();

    for field in rule.fields {
        let value = slots.get(field.name).map(String::as_str).unwrap_or_default();
        let piece = field.apply(value);
        if piece.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(lead_after(&out, field.lead));
        }
        out.push_str(&piece);
    }

    if let Some(terminator) = rule.terminator {
        if !out.is_empty() && !ends_in_terminal(&out) {
            out.push(terminator);
        }
    }

    out.trim().to_string()
}

/// The part of `lead` still needed after `text`
fn lead_after<'a>(text: &str, lead: &'a str) -> &'a str {
    if let Some(rest) = lead.strip_prefix('.') {
        if ends_in_terminal(text) {
            return rest;
        }
    }
    if let Some(rest) = lead.strip_prefix(',') {
        if text.ends_with(CLOSING_QUOTES) && ends_in_terminal(text) {
            return rest;
        }
    }
    lead
}

/// Ends in `.`, `?` or `!`, possibly inside closing quotes
fn ends_in_terminal(text: &str) -> bool {
    text.trim_end_matches(CLOSING_QUOTES)
        .ends_with(TERMINAL_PUNCTUATION)
}
