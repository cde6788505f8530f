//! Ranked fuzzy proximity search.
//!
//! Provides the [`Searcher`], which turns a free-text request into backend rounds and a
//! ranked page of books.
//!
//! # Search Algorithm
//!
//! 1. **Validation**: split the query into terms and check the field. Nothing reaches the
//!    backend until both pass.
//!
//! 2. **Full Round**: one proximity query over every term. Each hit's highlighted snippets
//!    are scored against the full term set. See [`round`].
//!
//! 3. **Fallback Expansion**: when the full round returns fewer than `min_hits` hits and the
//!    query has more than one term, run one smaller round per omitted term. These rounds are
//!    independent and may run concurrently; their results keep planned order either way.
//!
//! 4. **Rank and Page**: dedupe by id (first round wins), cap by score, apply the requested
//!    order and paginate. See [`pipeline`].

mod params;
mod pipeline;
mod round;
mod types;

use std::{iter, time::Instant};

use booksearch_query::{TermSet, split_terms, validate_field};
use booksearch_score::SnippetScorer;
use futures::future::try_join_all;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, instrument};

pub use params::{SearchParams, SearchRequest};
pub use pipeline::{RankOptions, dedupe, paginate, process_candidates, sort_documents};
pub use round::{PlannedRound, Round, RoundOutcome, plan_fallback, plan_full, score_round};
pub use types::{PipelineStats, ScoredDocument, SearchResponse};

use crate::{
    SearchError,
    backend::{Backend, search_body},
};

/// Every round a request may issue, planned before any backend call.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    /// Terms of the query, in order.
    pub terms: TermSet,
    /// Field being searched.
    pub field: String,
    /// The full-set round.
    pub full: PlannedRound,
    /// Fallback rounds, issued only if the full round under-returns.
    pub fallback: Vec<PlannedRound>,
}

impl SearchPlan {
    /// Returns the backend request body of every planned round, full round first.
    pub fn request_bodies(&self) -> Vec<(Round, Value)> {
        iter::once(&self.full)
            .chain(&self.fallback)
            .map(|planned| (planned.round, search_body(&planned.query)))
            .collect()
    }
}

/// Returns true when fallback rounds should follow a full round.
fn needs_fallback(full_hits: usize, term_count: usize, min_hits: usize) -> bool {
    full_hits < min_hits && term_count > 1
}

/// Primary search entry point.
pub struct Searcher<B> {
    /// Backend the rounds are sent to.
    backend: B,
    /// Pipeline parameters.
    params: SearchParams,
    /// Scores highlighted snippets.
    scorer: SnippetScorer,
}

impl<B: Backend> Searcher<B> {
    /// Creates a searcher with the default highlight markers.
    pub fn new(backend: B, params: SearchParams) -> Self {
        Self {
            backend,
            params,
            scorer: SnippetScorer::default(),
        }
    }

    /// Replaces the snippet scorer, and with it the highlight markers requested from the
    /// backend.
    pub fn with_scorer(mut self, scorer: SnippetScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the pipeline parameters.
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Validates a request and plans its rounds without contacting the backend.
    pub fn plan(&self, request: &SearchRequest) -> Result<SearchPlan, SearchError> {
        let terms = split_terms(&request.query)?;
        let field = request.field.as_deref().unwrap_or(&self.params.field);
        validate_field(field)?;

        let markers = self.scorer.markers();
        let full = plan_full(&terms, field, self.params.full_round_size, markers);
        let fallback = plan_fallback(&terms, field, self.params.fallback_round_size, markers);

        Ok(SearchPlan {
            field: field.to_string(),
            terms,
            full,
            fallback,
        })
    }

    /// Runs a search request.
    ///
    /// Client errors are returned before any backend call. A backend error in any round
    /// aborts the request, as does exceeding the configured timeout.
    #[instrument(skip(self, request), fields(query = %request.query, sort = request.sort.as_str()))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let plan = self.plan(request)?;

        let outcomes = timeout(self.params.timeout, self.run_rounds(&plan))
            .await
            .map_err(|_| SearchError::Timeout(self.params.timeout))??;

        let options = RankOptions {
            sort: request.sort,
            score_cap: self.params.score_cap,
            skip: request.skip,
            take: request.take.unwrap_or(self.params.page_size),
        };
        let (documents, mut stats) = process_candidates(outcomes, &options);
        stats.term_count = plan.terms.len();

        debug!(
            unique = stats.unique_documents,
            returned = stats.returned_documents,
            fallback_rounds = stats.fallback_rounds,
            "search complete"
        );
        Ok(SearchResponse { documents, stats })
    }

    /// Runs the full round and, when needed, the fallback rounds.
    ///
    /// Outcomes are returned in planned order.
    async fn run_rounds(&self, plan: &SearchPlan) -> Result<Vec<RoundOutcome>, SearchError> {
        let full = self.run_round(&plan.full).await?;
        if !needs_fallback(full.raw_hits, plan.terms.len(), self.params.min_hits) {
            return Ok(vec![full]);
        }

        debug!(
            hits = full.raw_hits,
            min_hits = self.params.min_hits,
            rounds = plan.fallback.len(),
            "expanding with fallback rounds"
        );

        let mut outcomes = Vec::with_capacity(plan.fallback.len() + 1);
        outcomes.push(full);
        if self.params.concurrent_rounds {
            let rounds = plan.fallback.iter().map(|planned| self.run_round(planned));
            outcomes.extend(try_join_all(rounds).await?);
        } else {
            for planned in &plan.fallback {
                outcomes.push(self.run_round(planned).await?);
            }
        }
        Ok(outcomes)
    }

    /// Sends one round and scores its hits.
    #[instrument(skip(self, planned), fields(round = ?planned.round, terms = planned.terms.len()))]
    async fn run_round(&self, planned: &PlannedRound) -> Result<RoundOutcome, SearchError> {
        let start = Instant::now();
        let hits = self.backend.search(&planned.query).await?;
        debug!(
            hits = hits.len(),
            elapsed = ?start.elapsed(),
            "round returned"
        );
        Ok(score_round(planned, hits, &self.scorer))
    }
}
