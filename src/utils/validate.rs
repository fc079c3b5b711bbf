//! URL validation for documents handed to the extractor.

use thiserror::Error;
use url::Url;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL contains potentially dangerous characters")]
    DangerousUrl,
}

/// Validate that `url` is an absolute http(s) URL with a host.
///
/// Returns the parsed URL, or `Err(ValidationError)` if invalid.
pub fn validate_url(url: &str) -> Result<Url, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    if url.contains('\0') || url.contains('\n') || url.contains('\r') {
        return Err(ValidationError::DangerousUrl);
    }

    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::InvalidUrl(format!(
                "invalid scheme: {}",
                other
            )))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com/article").is_ok());
        assert!(validate_url("  http://www.example.org  ").is_ok());
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(validate_url(""), Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(validate_url("not a url"), Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert_eq!(
            validate_url("https://example.com/\0"),
            Err(ValidationError::DangerousUrl)
        );
    }
}
