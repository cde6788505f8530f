//! Parameter types for search execution.

use std::time::Duration;

use booksearch_config::{BackendSettings, Config, SearchSettings};
use booksearch_query::{QueryError, SortOrder};

/// Pipeline parameters that stay fixed across requests.
///
/// The search proceeds in four phases:
/// 1. **Full round**: query every term, fetching up to `full_round_size` hits
/// 2. **Fallback rounds**: if fewer than `min_hits` came back and there is more than one
///    term, query each "one term removed" set for up to `fallback_round_size` hits
/// 3. **Rank**: dedupe, sort by score, keep the top `score_cap`, then apply the sort order
/// 4. **Page**: skip and take, `page_size` by default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Field searched when a request names none.
    pub field: String,
    /// Full-set hit count below which fallback rounds run.
    pub min_hits: usize,
    /// Hits requested in the full-set round.
    pub full_round_size: usize,
    /// Hits requested in each fallback round.
    pub fallback_round_size: usize,
    /// Documents kept by score before the sort order applies.
    pub score_cap: usize,
    /// Page size used when a request names none.
    pub page_size: usize,
    /// Whether fallback rounds are issued concurrently.
    pub concurrent_rounds: bool,
    /// Deadline for a whole request.
    pub timeout: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default(), &BackendSettings::default())
    }
}

impl SearchParams {
    /// Builds parameters from the configuration sections.
    pub fn from_settings(search: &SearchSettings, backend: &BackendSettings) -> Self {
        Self {
            field: search.field.clone(),
            min_hits: search.min_hits,
            full_round_size: search.full_round_size,
            fallback_round_size: search.fallback_round_size,
            score_cap: search.score_cap,
            page_size: search.page_size,
            concurrent_rounds: search.concurrent_rounds,
            timeout: backend.timeout,
        }
    }

    /// Builds parameters from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::from_settings(&config.search, &config.backend)
    }
}

/// One search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Field to search; the configured default if `None`.
    pub field: Option<String>,
    /// Presentation order.
    pub sort: SortOrder,
    /// Documents to skip.
    pub skip: usize,
    /// Documents to return; the configured page size if `None`.
    pub take: Option<usize>,
}

impl SearchRequest {
    /// Creates a request with default field, order and page.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Sets the field to search.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the presentation order.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the presentation order from its wire name.
    pub fn with_sort_key(self, key: &str) -> Result<Self, QueryError> {
        Ok(self.with_sort(key.parse()?))
    }

    /// Sets the number of documents to skip.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Sets the number of documents to return.
    pub fn with_take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }
}
