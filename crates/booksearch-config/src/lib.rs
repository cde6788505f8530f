//! Configuration system for booksearch.
//!
//! booksearch uses TOML configuration files named `.booksearch.toml`. Configuration is
//! resolved by walking up the directory tree from the current working directory, collecting
//! any `.booksearch.toml` files found, then loading `~/.booksearch.toml` as the global config
//! with lowest precedence.
//!
//! ```toml
//! [backend]
//! url = "http://localhost:9200"
//! index = "books"
//!
//! [search]
//! field = "content"
//! page_size = 10
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{
    CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config,
    require_global_config_path,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawBackendSettings, RawConfig, RawSearchSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for booksearch.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.booksearch.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Search backend settings.
    pub backend: BackendSettings,
    /// Search pipeline settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.booksearch.toml` files.
    ///
    /// Files closer to `cwd` take precedence. Returns `Ok(Config::default())` if no
    /// configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - Backend URLs without an http or https scheme
    /// - Empty index or field names
    /// - Sizes and counts that are zero
    /// - A page size larger than the score cap
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same shape as a `.booksearch.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            backend: &self.backend,
            search: &self.search,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Settings for reaching the search backend.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the Elasticsearch cluster.
    pub url: String,
    /// Index holding the books.
    pub index: String,
    /// Timeout for one whole search request, all rounds included.
    #[serde(rename = "timeout_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
    /// Health checks attempted at startup before giving up.
    pub connect_attempts: u32,
    /// Pause between startup health checks.
    #[serde(rename = "retry_delay_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub retry_delay: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:9200"),
            index: String::from("books"),
            timeout: Duration::from_secs(30),
            connect_attempts: 5,
            retry_delay: Duration::from_secs(3),
        }
    }
}

/// Settings for the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Field searched when a request names none.
    pub field: String,
    /// Full-set hit count below which fallback rounds run.
    pub min_hits: usize,
    /// Hits requested in the full-set round.
    pub full_round_size: usize,
    /// Hits requested in each fallback round.
    pub fallback_round_size: usize,
    /// Documents kept by score before any other sort order applies.
    pub score_cap: usize,
    /// Page size used when a request names none.
    pub page_size: usize,
    /// Whether fallback rounds are issued concurrently.
    pub concurrent_rounds: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            field: String::from("content"),
            min_hits: 30,
            full_round_size: 1000,
            fallback_round_size: 30,
            score_cap: 30,
            page_size: 10,
            concurrent_rounds: true,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Search backend settings.
    backend: &'a BackendSettings,
    /// Search pipeline settings.
    search: &'a SearchSettings,
}
