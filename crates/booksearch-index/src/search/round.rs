//! Query rounds.
//!
//! A search is a list of rounds planned up front: the full-set round, then (when it
//! under-returns) one fallback round per omitted term in term-index order. Every round
//! goes through the same build, fetch and score steps; only the term set and the scoring
//! baseline differ.

use booksearch_query::{ProximityQuery, TermSet};
use booksearch_score::{Markers, RoundKind, SnippetScorer};
use tracing::warn;

use super::types::ScoredDocument;
use crate::backend::{BackendQuery, Hit};

/// Which terms a round searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// Every term of the query.
    Full,
    /// Every term except the one at `omitted`.
    Fallback {
        /// Index of the omitted term in the original query.
        omitted: usize,
    },
}

impl Round {
    /// Returns the scoring kind for this round.
    pub fn kind(self) -> RoundKind {
        match self {
            Self::Full => RoundKind::Full,
            Self::Fallback { .. } => RoundKind::Partial,
        }
    }
}

/// A round ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct PlannedRound {
    /// Which terms the round uses.
    pub round: Round,
    /// The round's term set, in original order.
    pub terms: TermSet,
    /// The backend query for the term set.
    pub query: BackendQuery,
}

impl PlannedRound {
    /// Plans a round over `terms`.
    fn new(round: Round, terms: TermSet, field: &str, size: usize, markers: &Markers) -> Self {
        let query = BackendQuery {
            query: ProximityQuery::build(&terms, field),
            size,
            markers: markers.clone(),
        };
        Self {
            round,
            terms,
            query,
        }
    }
}

/// Plans the full-set round.
pub fn plan_full(terms: &TermSet, field: &str, size: usize, markers: &Markers) -> PlannedRound {
    PlannedRound::new(Round::Full, terms.clone(), field, size, markers)
}

/// Plans one fallback round per omitted term, in term-index order.
///
/// Returns an empty list for single-term queries.
pub fn plan_fallback(
    terms: &TermSet,
    field: &str,
    size: usize,
    markers: &Markers,
) -> Vec<PlannedRound> {
    terms
        .omissions()
        .into_iter()
        .map(|(omitted, reduced)| {
            PlannedRound::new(Round::Fallback { omitted }, reduced, field, size, markers)
        })
        .collect()
}

/// Scored hits of one round, in backend order.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Which round produced the hits.
    pub round: Round,
    /// Hits returned by the backend, including skipped ones.
    pub raw_hits: usize,
    /// Hits whose stored document could not be decoded.
    pub skipped: usize,
    /// Scored documents.
    pub documents: Vec<ScoredDocument>,
}

/// Scores a round's hits against the round's term set.
///
/// A hit whose stored document does not decode is skipped and counted; it never fails
/// the round.
pub fn score_round(planned: &PlannedRound, hits: Vec<Hit>, scorer: &SnippetScorer) -> RoundOutcome {
    let raw_hits = hits.len();
    let mut skipped = 0;
    let mut documents = Vec::with_capacity(raw_hits);

    for hit in hits {
        let book = match hit.book() {
            Ok(book) => book,
            Err(err) => {
                warn!(id = %hit.id, error = %err, "skipping malformed document");
                skipped += 1;
                continue;
            }
        };

        let result = scorer.score(&hit.highlights, &planned.terms, planned.round.kind());
        let snippet = result
            .best
            .and_then(|index| hit.highlights.get(index).cloned());
        documents.push(ScoredDocument::from_book(hit.id, book, result.score, snippet));
    }

    RoundOutcome {
        round: planned.round,
        raw_hits,
        skipped,
        documents,
    }
}
