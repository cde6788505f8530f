//! Ranked fuzzy proximity search over an Elasticsearch book index.
//!
//! This crate connects the query and scoring crates to a search backend. It handles:
//! - The [`Backend`] gateway and its Elasticsearch implementation
//! - Planning full-set and fallback query rounds
//! - Scoring highlighted snippets per round
//! - Deduplication, score capping, sort orders and pagination
//!
//! # Example
//!
//! ```no_run
//! use booksearch_config::Config;
//! use booksearch_index::{ElasticBackend, SearchParams, SearchRequest, Searcher};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(".".as_ref())?;
//! let backend = ElasticBackend::connect(&config.backend).await?;
//! let searcher = Searcher::new(backend, SearchParams::from_config(&config));
//!
//! let response = searcher.search(&SearchRequest::new("old man sea")).await?;
//! for doc in &response.documents {
//!     println!("{:>6.2}  {}", doc.score, doc.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod backend;
mod document;
mod error;
mod search;

pub use backend::{Backend, BackendInfo, BackendQuery, ElasticBackend, Hit};
pub use document::Book;
pub use error::SearchError;
pub use search::{
    PipelineStats, PlannedRound, RankOptions, Round, RoundOutcome, ScoredDocument, SearchParams,
    SearchPlan, SearchRequest, SearchResponse, Searcher, dedupe, paginate, plan_fallback,
    plan_full, process_candidates, score_round, sort_documents,
};
