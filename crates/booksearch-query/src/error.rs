//! Error types for query construction.
//!
//! Everything in here is a client error: it is raised before the backend is contacted.

use thiserror::Error;

/// Errors raised while turning request parameters into backend queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query parameter was missing, empty, or whitespace only.
    #[error("query not specified")]
    Empty,

    /// The requested sort key is not one of the supported orders.
    #[error("unknown sort order: {0}")]
    UnknownSort(String),

    /// The requested field name is empty or contains characters the backend rejects.
    #[error("invalid field name: {0:?}")]
    InvalidField(String),
}

impl QueryError {
    /// Returns a suggestion for resolving the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Empty => Some("Pass one or more words to search for, e.g. 'old man sea'"),
            Self::UnknownSort(_) => {
                Some("Valid sort orders are: score, time_new, time_old, alphabet")
            }
            Self::InvalidField(_) => {
                Some("Field names are plain identifiers such as 'content' or 'title'")
            }
        }
    }
}
