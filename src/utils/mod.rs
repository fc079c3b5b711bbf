//! Utility modules supporting extraction and formatting.
//!
//! - [`HttpClient`]: HTTP client configured for document fetching
//! - [`parse_loose_date`]: Parse loosely formatted calendar dates
//! - [`collapse_whitespace`], [`sentence_case`], [`title_case`]: Text transforms
//! - [`validate_url`]: Check that a URL is a fetchable http(s) address
//!
//! # Loose Dates
//!
//! ```rust
//! use cite_master::utils::parse_loose_date;
//!
//! let date = parse_loose_date("March 5th, 2020").unwrap();
//! assert_eq!(date.format("%Y-%m-%d").to_string(), "2020-03-05");
//! assert!(parse_loose_date("sometime last spring").is_none());
//! ```

mod dates;
mod http;
mod text;
mod validate;

pub use dates::parse_loose_date;
pub use http::HttpClient;
pub use text::{clean_doi, collapse_whitespace, sentence_case, strip_url_scheme, title_case};
pub use validate::{validate_url, ValidationError};
