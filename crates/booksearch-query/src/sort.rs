//! Presentation orders for search results.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::QueryError;

/// How the final result list is ordered.
///
/// Every order is applied after results have been capped by score; non-score orders only
/// rearrange the capped set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Descending relevance score.
    #[default]
    Score,
    /// Most recently released first.
    TimeNew,
    /// Oldest release first.
    TimeOld,
    /// Lexicographic by title.
    Alphabet,
}

impl SortOrder {
    /// Returns the wire name of this order.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::TimeNew => "time_new",
            Self::TimeOld => "time_old",
            Self::Alphabet => "alphabet",
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "score" => Ok(Self::Score),
            "time_new" => Ok(Self::TimeNew),
            "time_old" => Ok(Self::TimeOld),
            "alphabet" => Ok(Self::Alphabet),
            other => Err(QueryError::UnknownSort(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
