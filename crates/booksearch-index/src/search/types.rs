//! Data structures returned by search.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Book;

/// A document with its relevance score.
///
/// Identity is the document id: two values with the same id are duplicates whatever their
/// scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    /// Backend document id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Publication date, if known.
    pub released_at: Option<DateTime<Utc>>,
    /// Relevance score from the round that first returned the document.
    pub score: f64,
    /// Highlighted snippet that produced the score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl ScoredDocument {
    /// Builds a scored document from a decoded hit.
    pub fn from_book(id: String, book: Book, score: f64, snippet: Option<String>) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            released_at: book.released_at,
            score,
            snippet,
        }
    }
}

/// Counts collected while a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Number of terms in the query.
    pub term_count: usize,
    /// Hits returned by the full-set round.
    pub full_round_hits: usize,
    /// Fallback rounds issued.
    pub fallback_rounds: usize,
    /// Hits returned by all fallback rounds together.
    pub fallback_hits: usize,
    /// Hits skipped because their stored document could not be decoded.
    pub skipped_documents: usize,
    /// Documents left after removing duplicates.
    pub unique_documents: usize,
    /// Documents left after the score cap.
    pub capped_documents: usize,
    /// Documents on the returned page.
    pub returned_documents: usize,
}

/// The answer to one search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// The page of ranked documents.
    pub documents: Vec<ScoredDocument>,
    /// How the page was produced.
    pub stats: PipelineStats,
}

impl SearchResponse {
    /// Returns true when no document matched.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
