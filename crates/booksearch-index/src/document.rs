//! Stored document model.
//!
//! [`Book`] is the document shape kept in the backend index. Every field is optional on
//! the way in, so a partially filled record still deserializes; a record that is not an
//! object at all (or has a wrongly typed field) fails and is skipped by the search
//! pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as stored in the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Book {
    /// Document identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// When the record was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the book was published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    /// Full text.
    pub content: String,
}

impl Book {
    /// Returns the first `max_chars` characters of the content.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}
