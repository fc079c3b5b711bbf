//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, write_default_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment variable overrides (`CITE_MASTER_EXTRACTOR__TIMEOUT_SECS=5`)
pub const ENV_PREFIX: &str = "CITE_MASTER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Metadata extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Citation formatting settings
    #[serde(default)]
    pub citation: CitationConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document fetching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Seconds before a fetch is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate validation
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// User agent sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum in-flight fetches during batch extraction
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: true,
            user_agent: default_user_agent(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_max_concurrent() -> usize {
    4
}

/// Citation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Style used when a request does not name one
    #[serde(default = "default_style")]
    pub default_style: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            default_style: default_style(),
        }
    }
}

fn default_style() -> String {
    "APA".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "json" for JSON lines, anything else for the human-readable format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables and defaults
pub fn get_config() -> Config {
    config::Config::builder()
        .add_source(environment())
        .build()
        .and_then(|settings| settings.try_deserialize())
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid environment configuration: {}", e);
            Config::default()
        })
}
