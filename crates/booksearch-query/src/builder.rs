//! Ordered proximity query construction.
//!
//! A [`ProximityQuery`] is the backend-neutral form of the query: one fuzzy clause per term,
//! in term order, with a fixed slop and strict ordering. [`ProximityQuery::to_value`]
//! renders it in the Elasticsearch span query DSL:
//!
//! ```json
//! { "span_near": {
//!     "clauses": [ { "span_multi": { "match": { "fuzzy": {
//!         "content": { "value": "old", "fuzziness": "0" } } } } } ],
//!     "slop": 1,
//!     "in_order": true } }
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::{
    error::QueryError,
    term::{SearchTerm, TermSet},
};

/// Maximum number of non-matching tokens tolerated between consecutive terms.
pub const DEFAULT_SLOP: u32 = 1;

/// One fuzzy-match clause of a proximity query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyClause {
    /// Value sent to the backend (lowercased term text).
    value: String,
    /// Maximum edit distance for this clause.
    fuzziness: u8,
}

impl FuzzyClause {
    /// Creates the clause for a search term.
    fn from_term(term: &SearchTerm) -> Self {
        Self {
            value: term.text().to_lowercase(),
            fuzziness: term.max_fuzziness(),
        }
    }

    /// Returns the clause value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the clause fuzziness.
    pub fn fuzziness(&self) -> u8 {
        self.fuzziness
    }
}

/// An ordered "near" query over a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityQuery {
    /// Field the clauses match against.
    field: String,
    /// Clauses in term order.
    clauses: Vec<FuzzyClause>,
    /// Token gap tolerance between consecutive clauses.
    slop: u32,
    /// Whether clauses must match in order.
    in_order: bool,
}

impl ProximityQuery {
    /// Builds the proximity query for `terms` over `field`.
    ///
    /// Clause order is exactly the term set order.
    pub fn build(terms: &TermSet, field: &str) -> Self {
        Self {
            field: field.to_string(),
            clauses: terms.iter().map(FuzzyClause::from_term).collect(),
            slop: DEFAULT_SLOP,
            in_order: true,
        }
    }

    /// Returns the target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the clauses in order.
    pub fn clauses(&self) -> &[FuzzyClause] {
        &self.clauses
    }

    /// Returns the slop.
    pub fn slop(&self) -> u32 {
        self.slop
    }

    /// Returns true when clauses must match in order.
    pub fn in_order(&self) -> bool {
        self.in_order
    }

    /// Renders the query in the Elasticsearch span query DSL.
    pub fn to_value(&self) -> Value {
        let clauses: Vec<Value> = self
            .clauses
            .iter()
            .map(|clause| {
                let mut field = Map::new();
                field.insert(
                    self.field.clone(),
                    json!({
                        "value": clause.value,
                        "fuzziness": clause.fuzziness.to_string(),
                    }),
                );
                json!({ "span_multi": { "match": { "fuzzy": Value::Object(field) } } })
            })
            .collect();

        json!({
            "span_near": {
                "clauses": clauses,
                "slop": self.slop,
                "in_order": self.in_order,
            }
        })
    }
}

impl Serialize for ProximityQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for ProximityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "span_near({}, slop={}, {})[",
            self.field,
            self.slop,
            if self.in_order { "ordered" } else { "unordered" }
        )?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}~{}", clause.value, clause.fuzziness)?;
        }
        write!(f, "]")
    }
}

/// Checks that a field name is safe to place in a backend query.
pub fn validate_field(field: &str) -> Result<(), QueryError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidField(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::split_terms;

    #[test]
    fn clause_order_matches_terms() {
        let terms = split_terms("old man sea").unwrap();
        let query = ProximityQuery::build(&terms, "content");
        let values: Vec<&str> = query.clauses().iter().map(FuzzyClause::value).collect();
        assert_eq!(values, vec!["old", "man", "sea"]);
        assert_eq!(query.slop(), DEFAULT_SLOP);
        assert!(query.in_order());
    }

    #[test]
    fn omitted_term_keeps_remaining_order() {
        let terms = split_terms("ancient mariner albatross").unwrap();
        let reduced = terms.without(1).unwrap();
        let query = ProximityQuery::build(&reduced, "content");
        let values: Vec<&str> = query.clauses().iter().map(FuzzyClause::value).collect();
        assert_eq!(values, vec!["ancient", "albatross"]);
        let fuzz: Vec<u8> = query.clauses().iter().map(FuzzyClause::fuzziness).collect();
        assert_eq!(fuzz, vec![1, 2]);
    }

    #[test]
    fn renders_span_near_dsl() {
        let terms = split_terms("Old harbour").unwrap();
        let value = ProximityQuery::build(&terms, "title").to_value();

        let near = &value["span_near"];
        assert_eq!(near["slop"], 1);
        assert_eq!(near["in_order"], true);

        let clauses = near["clauses"].as_array().unwrap();
        assert_eq!(clauses.len(), 2);
        let first = &clauses[0]["span_multi"]["match"]["fuzzy"]["title"];
        assert_eq!(first["value"], "old");
        assert_eq!(first["fuzziness"], "0");
        let second = &clauses[1]["span_multi"]["match"]["fuzzy"]["title"];
        assert_eq!(second["value"], "harbour");
        assert_eq!(second["fuzziness"], "1");
    }

    #[test]
    fn serializes_like_to_value() {
        let terms = split_terms("sea").unwrap();
        let query = ProximityQuery::build(&terms, "content");
        assert_eq!(serde_json::to_value(&query).unwrap(), query.to_value());
    }

    #[test]
    fn display_is_compact() {
        let terms = split_terms("old mariner").unwrap();
        let query = ProximityQuery::build(&terms, "content");
        assert_eq!(
            query.to_string(),
            "span_near(content, slop=1, ordered)[old~0, mariner~1]"
        );
    }

    #[test]
    fn field_validation() {
        assert!(validate_field("content").is_ok());
        assert!(validate_field("meta.title_raw").is_ok());
        assert_eq!(
            validate_field(""),
            Err(QueryError::InvalidField(String::new()))
        );
        assert!(validate_field("content\"}").is_err());
    }
}
