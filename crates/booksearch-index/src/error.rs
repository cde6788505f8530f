//! Error types for the booksearch-index crate.

use std::time::Duration;

use booksearch_query::QueryError;
use thiserror::Error;

/// Errors that can occur while searching or talking to the backend.
///
/// [`SearchError::Query`] is a client error and is raised before any backend call. Every
/// other variant is a backend error that aborts the whole request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request parameters were rejected.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The configured backend URL cannot be used.
    #[error("invalid backend url {url}: {reason}")]
    InvalidUrl {
        /// The configured URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP request could not be completed.
    #[error("backend request to {url} failed: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status} for {url}: {body}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The backend response did not have the expected shape.
    #[error("malformed backend response from {url}: {message}")]
    Malformed {
        /// Request URL.
        url: String,
        /// Decoding error message.
        message: String,
    },

    /// A document could not be serialized for the backend.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The request did not finish within its deadline.
    #[error("search timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The backend never answered a health check.
    #[error("backend at {url} unavailable after {attempts} attempt(s)")]
    Unavailable {
        /// Backend base URL.
        url: String,
        /// Health checks attempted.
        attempts: u32,
    },
}

impl SearchError {
    /// Returns true when the caller, not the backend, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Returns a suggestion for resolving the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Query(err) => err.suggestion(),
            Self::InvalidUrl { .. } => Some("Set [backend] url to an http:// or https:// URL"),
            Self::Unavailable { .. } | Self::Transport { .. } => {
                Some("Check that Elasticsearch is running and [backend] url points at it")
            }
            Self::Timeout(_) => Some("Raise [backend] timeout_secs or narrow the query"),
            Self::Status { status: 404, .. } => {
                Some("Check that [backend] index names an existing index")
            }
            _ => None,
        }
    }
}
