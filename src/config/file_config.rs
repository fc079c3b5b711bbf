//! Configuration file discovery and generation.
//!
//! # Configuration File Format
//!
//! ```toml
//! [extractor]
//! timeout_secs = 10
//! accept_invalid_certs = true
//! max_concurrent_requests = 4
//!
//! [citation]
//! default_style = "APA"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "cite-master.toml";

/// Find a configuration file in the default locations.
///
/// Checks `./cite-master.toml`, then `<config dir>/cite-master/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("cite-master").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Write the default configuration as TOML to `path`, creating parent directories
pub fn write_default_config(path: &Path) -> Result<(), ConfigFileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    let content = toml::to_string_pretty(&Config::default())
        .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default_config(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[extractor]"));
        assert!(content.contains("default_style = \"APA\""));

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
