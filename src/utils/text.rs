//! Text transforms shared by the extractor and the citation formatter.

/// Collapse runs of whitespace (including newlines) into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first character and lower-case the rest.
///
/// This is the coarse form of APA sentence case: proper nouns after the first
/// word are lowered too.
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize every whitespace-separated word, lower-casing the rest of it
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(sentence_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop a leading `http://` or `https://`
pub fn strip_url_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Reduce a DOI given as a link or `doi:` URI to the bare identifier
pub fn clean_doi(doi: &str) -> &str {
    let doi = doi.trim();
    let lower = doi.to_ascii_lowercase();
    for prefix in [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi:",
    ] {
        if lower.starts_with(prefix) {
            return doi[prefix.len()..].trim_start();
        }
    }
    doi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  A\n  title\t here "), "A title here");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("the Rust Programming LANGUAGE"), "The rust programming language");
        assert_eq!(sentence_case("éclair"), "Éclair");
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the rust  programming language"), "The Rust Programming Language");
        assert_eq!(title_case("THE STATE OF RUST"), "The State Of Rust");
        assert_eq!(title_case("iPhone sALES soar"), "Iphone Sales Soar");
    }

    #[test]
    fn test_strip_url_scheme() {
        assert_eq!(strip_url_scheme("https://example.com/a"), "example.com/a");
        assert_eq!(strip_url_scheme("http://example.com"), "example.com");
        assert_eq!(strip_url_scheme("example.com"), "example.com");
    }

    #[test]
    fn test_clean_doi() {
        assert_eq!(clean_doi("10.1000/xyz"), "10.1000/xyz");
        assert_eq!(clean_doi("https://doi.org/10.1000/xyz"), "10.1000/xyz");
        assert_eq!(clean_doi("DOI: 10.1000/xyz"), "10.1000/xyz");
        assert_eq!(clean_doi("http://dx.doi.org/10.1000/xyz"), "10.1000/xyz");
    }
}
