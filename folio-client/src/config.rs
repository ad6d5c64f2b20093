//! Client configuration, loadable from a TOML file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Connection settings for the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Capacity of the in-memory response cache.
    pub cache_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            cache_capacity: 64,
        }
    }
}

impl ClientConfig {
    pub fn from_toml(text: &str) -> Result<Self, ApiError> {
        let mut config: ClientConfig =
            toml::from_str(text).map_err(|e| ApiError::Config(e.to_string()))?;
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_fill_missing_keys() {
        let config = ClientConfig::from_toml("base_url = \"https://folio.example.com\"").unwrap();
        assert_eq!(config.base_url, "https://folio.example.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.cache_capacity, 64);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::from_toml("base_url = \"http://localhost:5000/\"").unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = ClientConfig::from_toml("base_url = ").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 5\ncache_capacity = 8").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ClientConfig::from_file(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
