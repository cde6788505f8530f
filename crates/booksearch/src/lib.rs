//! booksearch: fuzzy proximity search over a book collection.
//!
//! Books live in an Elasticsearch index. A query is split into terms, each term gets a
//! fuzziness allowance from its length, and the terms must appear in order and close
//! together. Hits are ranked by how well their highlighted snippets match; when the full
//! query finds too little, the search widens by dropping one term at a time.

#![warn(missing_docs)]

pub mod cli;
