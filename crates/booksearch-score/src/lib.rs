//! Relevance scoring from highlighted snippets.
//!
//! The search backend decides *whether* a document matches; this crate decides *how well*.
//! It reads the backend's highlighted snippets and rewards matches whose terms sit close
//! together and are spelled close to the query:
//!
//! - [`markup`] turns `the <em>old</em> man` into plain and matched tokens
//! - [`distance`] estimates whether a matched word is 0, 1 or "2 or more" edits from its term
//! - [`scorer`] walks the tokens, counts gaps and fuzziness, and keeps the best snippet
//!
//! # Example
//!
//! ```
//! use booksearch_query::split_terms;
//! use booksearch_score::{Baseline, RoundKind, SnippetScorer};
//!
//! let terms = split_terms("old man sea").unwrap();
//! let scorer = SnippetScorer::default();
//! let result = scorer.score(
//!     ["the <em>old</em> <em>man</em> and the <em>sea</em>"],
//!     &terms,
//!     RoundKind::Full,
//! );
//! // "and the" costs two gaps
//! let baseline = Baseline::new(3, RoundKind::Full);
//! assert_eq!(result.score, baseline.max_score() - 2.0 * 3.0);
//! ```

#![warn(missing_docs)]

pub mod distance;
pub mod markup;
pub mod scorer;

pub use distance::{SATURATED_DISTANCE, estimate};
pub use markup::{Markers, Segment, Token, parse_segments, tokenize};
pub use scorer::{Baseline, RoundKind, SnippetScore, SnippetScorer};
