//! Configuration file parsing.
//!
//! Parses individual `.booksearch.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Search backend section.
    pub backend: Option<RawBackendSettings>,
    /// Search pipeline section.
    pub search: Option<RawSearchSettings>,
}

/// Raw search backend settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBackendSettings {
    /// Base URL of the Elasticsearch cluster.
    pub url: Option<String>,
    /// Index holding the books.
    pub index: Option<String>,
    /// Timeout for one whole search request.
    #[serde(rename = "timeout_secs")]
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,
    /// Health checks attempted before giving up on the backend.
    pub connect_attempts: Option<u32>,
    /// Pause between health checks.
    #[serde(rename = "retry_delay_secs")]
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub retry_delay: Option<Duration>,
}

/// Raw search pipeline settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Field searched when a request names none.
    pub field: Option<String>,
    /// Full-set hit count below which fallback rounds run.
    pub min_hits: Option<usize>,
    /// Hits requested in the full-set round.
    pub full_round_size: Option<usize>,
    /// Hits requested in each fallback round.
    pub fallback_round_size: Option<usize>,
    /// Documents kept by score before any other sort order applies.
    pub score_cap: Option<usize>,
    /// Page size used when a request names none.
    pub page_size: Option<usize>,
    /// Whether fallback rounds are issued concurrently.
    pub concurrent_rounds: Option<bool>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.backend.is_none());
        assert!(config.search.is_none());
    }

    #[test]
    fn test_parse_backend_settings() {
        let toml = r#"
[backend]
url = "http://search.internal:9200"
index = "library"
timeout_secs = 5
connect_attempts = 10
retry_delay_secs = 1
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.url.as_deref(), Some("http://search.internal:9200"));
        assert_eq!(backend.index.as_deref(), Some("library"));
        assert_eq!(backend.timeout, Some(Duration::from_secs(5)));
        assert_eq!(backend.connect_attempts, Some(10));
        assert_eq!(backend.retry_delay, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_parse_partial_backend_settings() {
        let toml = r#"
[backend]
index = "poems"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.index.as_deref(), Some("poems"));
        assert!(backend.url.is_none());
        assert!(backend.timeout.is_none());
        assert!(backend.retry_delay.is_none());
    }

    #[test]
    fn test_parse_search_settings() {
        let toml = r#"
[search]
field = "title"
min_hits = 10
full_round_size = 500
fallback_round_size = 20
score_cap = 50
page_size = 25
concurrent_rounds = false
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let search = config.search.unwrap();
        assert_eq!(search.field.as_deref(), Some("title"));
        assert_eq!(search.min_hits, Some(10));
        assert_eq!(search.full_round_size, Some(500));
        assert_eq!(search.fallback_round_size, Some(20));
        assert_eq!(search.score_cap, Some(50));
        assert_eq!(search.page_size, Some(25));
        assert_eq!(search.concurrent_rounds, Some(false));
    }

    #[test]
    fn test_parse_root() {
        let config = parse_config_str("root = true\n", Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("[backend\nurl = ", Path::new("broken.toml"));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config_str("[search]\npage_size = \"ten\"\n", Path::new("t.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_negative_duration_rejected() {
        let result = parse_config_str("[backend]\ntimeout_secs = -1\n", Path::new("t.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_config_file(Path::new("/nonexistent/.booksearch.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
