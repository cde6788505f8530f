//! Query construction for booksearch.
//!
//! A free-text query goes through three steps before it reaches the search backend:
//!
//! - **Splitting**: `old man sea` becomes the ordered [`TermSet`] `[old, man, sea]`
//! - **Fuzziness**: each [`SearchTerm`] gets a maximum edit distance from its length
//!   (`<4` chars: 0, `4..8`: 1, `>=8`: 2)
//! - **Building**: the term set becomes an ordered [`ProximityQuery`] (slop 1, in order)
//!   with one fuzzy clause per term
//!
//! Fallback rounds reuse the same builder on a term set with one term removed, see
//! [`TermSet::omissions`].
//!
//! # Example
//!
//! ```
//! use booksearch_query::{ProximityQuery, split_terms};
//!
//! let terms = split_terms("old man sea").unwrap();
//! let query = ProximityQuery::build(&terms, "content");
//! assert_eq!(query.clauses().len(), 3);
//! assert_eq!(query.slop(), 1);
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
mod fuzziness;
mod sort;
mod term;

pub use builder::{DEFAULT_SLOP, FuzzyClause, ProximityQuery, validate_field};
pub use error::QueryError;
pub use fuzziness::{FUZZY_ONE_MIN_LEN, FUZZY_TWO_MIN_LEN, MAX_FUZZINESS, max_fuzzy};
pub use sort::SortOrder;
pub use term::{SearchTerm, TermSet, split_terms};
