//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::path::{Path, PathBuf};

use crate::{
    BackendSettings, Config, ConfigError, SearchSettings,
    parse::{RawBackendSettings, RawConfig, RawSearchSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every key the first defined value wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let backend = merge_backend_settings(configs);
    let search = merge_search_settings(configs);
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Ok(Config {
        backend,
        search,
        config_root,
    })
}

/// Merges backend settings, taking first defined value for each field.
fn merge_backend_settings(configs: &[ParsedConfig]) -> BackendSettings {
    let mut result = BackendSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref backend) = parsed.config.backend {
            apply_raw_backend(&mut result, backend);
        }
    }

    result
}

/// Applies raw backend settings to result, overwriting any present values.
fn apply_raw_backend(result: &mut BackendSettings, raw: &RawBackendSettings) {
    if let Some(ref v) = raw.url {
        result.url = v.clone();
    }
    if let Some(ref v) = raw.index {
        result.index = v.clone();
    }
    if let Some(v) = raw.timeout {
        result.timeout = v;
    }
    if let Some(v) = raw.connect_attempts {
        result.connect_attempts = v;
    }
    if let Some(v) = raw.retry_delay {
        result.retry_delay = v;
    }
}

/// Merges search settings.
fn merge_search_settings(configs: &[ParsedConfig]) -> SearchSettings {
    let mut result = SearchSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref search) = parsed.config.search {
            apply_raw_search(&mut result, search);
        }
    }

    result
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(ref v) = raw.field {
        result.field = v.clone();
    }
    if let Some(v) = raw.min_hits {
        result.min_hits = v;
    }
    if let Some(v) = raw.full_round_size {
        result.full_round_size = v;
    }
    if let Some(v) = raw.fallback_round_size {
        result.fallback_round_size = v;
    }
    if let Some(v) = raw.score_cap {
        result.score_cap = v;
    }
    if let Some(v) = raw.page_size {
        result.page_size = v;
    }
    if let Some(v) = raw.concurrent_rounds {
        result.concurrent_rounds = v;
    }
}
