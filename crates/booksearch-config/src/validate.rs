//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::{BackendSettings, Config, SearchSettings};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The backend URL is not an http or https URL.
    InvalidBackendUrl {
        /// The configured URL.
        url: String,
    },
    /// The backend index name is empty.
    EmptyIndex,
    /// The default search field is empty.
    EmptyField,
    /// A size or count that must be positive is zero.
    ZeroValue {
        /// Dotted name of the setting.
        key: &'static str,
    },
    /// Pages can never be filled because the score cap is smaller.
    PageSizeExceedsCap {
        /// Configured page size.
        page_size: usize,
        /// Configured score cap.
        score_cap: usize,
    },
    /// Fallback rounds would trigger on every search.
    MinHitsExceedsRoundSize {
        /// Configured fallback threshold.
        min_hits: usize,
        /// Configured full-set round size.
        full_round_size: usize,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBackendUrl { url } => {
                write!(f, "backend url is not an http(s) url: {url}")
            }
            Self::EmptyIndex => write!(f, "backend index name is empty"),
            Self::EmptyField => write!(f, "default search field is empty"),
            Self::ZeroValue { key } => write!(f, "{key} is 0"),
            Self::PageSizeExceedsCap {
                page_size,
                score_cap,
            } => write!(
                f,
                "search.page_size ({page_size}) is larger than search.score_cap ({score_cap})"
            ),
            Self::MinHitsExceedsRoundSize {
                min_hits,
                full_round_size,
            } => write!(
                f,
                "search.min_hits ({min_hits}) is larger than search.full_round_size \
                 ({full_round_size}); fallback rounds will always run"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = validate_backend(&config.backend);
    warnings.extend(validate_search(&config.search));
    warnings
}

/// Validates the backend section.
fn validate_backend(backend: &BackendSettings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !(backend.url.starts_with("http://") || backend.url.starts_with("https://")) {
        warnings.push(ConfigWarning::InvalidBackendUrl {
            url: backend.url.clone(),
        });
    }
    if backend.index.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyIndex);
    }
    if backend.timeout.is_zero() {
        warnings.push(ConfigWarning::ZeroValue {
            key: "backend.timeout_secs",
        });
    }
    if backend.connect_attempts == 0 {
        warnings.push(ConfigWarning::ZeroValue {
            key: "backend.connect_attempts",
        });
    }

    warnings
}

/// Validates the search section.
fn validate_search(search: &SearchSettings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if search.field.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyField);
    }

    let sizes = [
        ("search.full_round_size", search.full_round_size),
        ("search.fallback_round_size", search.fallback_round_size),
        ("search.score_cap", search.score_cap),
        ("search.page_size", search.page_size),
    ];
    for (key, value) in sizes {
        if value == 0 {
            warnings.push(ConfigWarning::ZeroValue { key });
        }
    }

    if search.page_size > search.score_cap {
        warnings.push(ConfigWarning::PageSizeExceedsCap {
            page_size: search.page_size,
            score_cap: search.score_cap,
        });
    }
    if search.min_hits > search.full_round_size {
        warnings.push(ConfigWarning::MinHitsExceedsRoundSize {
            min_hits: search.min_hits,
            full_round_size: search.full_round_size,
        });
    }

    warnings
}
