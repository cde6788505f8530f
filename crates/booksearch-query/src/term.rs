//! Search terms and ordered term sets.

use std::{fmt, slice};

use serde::Serialize;

use crate::{error::QueryError, fuzziness::max_fuzzy};

/// A single whitespace-delimited word from the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTerm {
    /// The term as typed.
    text: String,
    /// Maximum edit distance tolerated when matching this term.
    max_fuzziness: u8,
}

impl SearchTerm {
    /// Creates a term, deriving its fuzziness from its length.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let max_fuzziness = max_fuzzy(&text);
        Self {
            text,
            max_fuzziness,
        }
    }

    /// Returns the term text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the maximum edit distance tolerated for this term.
    pub fn max_fuzziness(&self) -> u8 {
        self.max_fuzziness
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.text, self.max_fuzziness)
    }
}

/// An ordered sequence of search terms.
///
/// Order matters: proximity queries built from a term set require the terms in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TermSet {
    /// Terms in query order.
    terms: Vec<SearchTerm>,
}

impl TermSet {
    /// Creates a term set from terms in query order.
    pub fn new(terms: Vec<SearchTerm>) -> Self {
        Self { terms }
    }

    /// Returns the number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true when the set holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the term at `index`.
    pub fn get(&self, index: usize) -> Option<&SearchTerm> {
        self.terms.get(index)
    }

    /// Iterates over the terms in order.
    pub fn iter(&self) -> slice::Iter<'_, SearchTerm> {
        self.terms.iter()
    }

    /// Returns a copy of this set with the term at `index` removed.
    ///
    /// The remaining terms keep their relative order. Returns `None` if `index` is out of
    /// range.
    pub fn without(&self, index: usize) -> Option<Self> {
        if index >= self.terms.len() {
            return None;
        }
        let terms = self
            .terms
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, term)| term.clone())
            .collect();
        Some(Self { terms })
    }

    /// Returns every "one term removed" variant of this set, in term-index order.
    ///
    /// Each entry pairs the omitted index with the reduced set. A set of one term has no
    /// meaningful omissions and yields an empty list.
    pub fn omissions(&self) -> Vec<(usize, Self)> {
        if self.terms.len() < 2 {
            return Vec::new();
        }
        (0..self.terms.len())
            .filter_map(|index| self.without(index).map(|set| (index, set)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a SearchTerm;
    type IntoIter = slice::Iter<'a, SearchTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl fmt::Display for TermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for term in &self.terms {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
            first = false;
        }
        Ok(())
    }
}

/// Splits a raw query into an ordered term set.
///
/// Terms are separated by any run of whitespace. A query with no terms is a client error.
pub fn split_terms(query: &str) -> Result<TermSet, QueryError> {
    let terms: Vec<SearchTerm> = query.split_whitespace().map(SearchTerm::new).collect();
    if terms.is_empty() {
        return Err(QueryError::Empty);
    }
    Ok(TermSet::new(terms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(set: &TermSet) -> Vec<&str> {
        set.iter().map(SearchTerm::text).collect()
    }

    #[test]
    fn splits_on_whitespace_runs() {
        let set = split_terms("  old\tman   sea \n").unwrap();
        assert_eq!(texts(&set), vec!["old", "man", "sea"]);
    }

    #[test]
    fn empty_query_is_client_error() {
        assert_eq!(split_terms(""), Err(QueryError::Empty));
        assert_eq!(split_terms("   \t "), Err(QueryError::Empty));
    }

    #[test]
    fn terms_carry_fuzziness() {
        let set = split_terms("cat frog elephant").unwrap();
        let fuzz: Vec<u8> = set.iter().map(SearchTerm::max_fuzziness).collect();
        assert_eq!(fuzz, vec![0, 1, 2]);
    }

    #[test]
    fn without_preserves_order() {
        let set = split_terms("a b c d").unwrap();
        assert_eq!(texts(&set.without(0).unwrap()), vec!["b", "c", "d"]);
        assert_eq!(texts(&set.without(2).unwrap()), vec!["a", "b", "d"]);
        assert_eq!(texts(&set.without(3).unwrap()), vec!["a", "b", "c"]);
        assert!(set.without(4).is_none());
    }

    #[test]
    fn omissions_cover_every_index_in_order() {
        let set = split_terms("old man sea").unwrap();
        let omissions = set.omissions();
        let indices: Vec<usize> = omissions.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(texts(&omissions[0].1), vec!["man", "sea"]);
        assert_eq!(texts(&omissions[1].1), vec!["old", "sea"]);
        assert_eq!(texts(&omissions[2].1), vec!["old", "man"]);
    }

    #[test]
    fn single_term_has_no_omissions() {
        let set = split_terms("whale").unwrap();
        assert!(set.omissions().is_empty());
    }

    #[test]
    fn display_shows_fuzziness() {
        let set = split_terms("old sailor").unwrap();
        assert_eq!(set.to_string(), "old~0 sailor~1");
    }
}
