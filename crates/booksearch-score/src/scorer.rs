//! Snippet scoring.
//!
//! Each snippet is scanned for a complete, in-order run of the round's terms. A run loses
//! points for every unhighlighted word between its first and last term (a *gap*) and for
//! the fuzziness of each matched word relative to the term's allowance. The best run across
//! a hit's snippets is the hit's score for that round.
//!
//! # Baselines
//!
//! Scores from the full-set round and from fallback rounds end up in one ranked list, so
//! their ranges are separated. With `n` the number of terms in the *original* query:
//!
//! | Round    | Floor     | Maximum score  |
//! |----------|-----------|----------------|
//! | fallback | `0`       | `n² + 1`       |
//! | full set | `n² + 2`  | `2 · (n² + 1)` |
//!
//! Every hit starts at its round's floor and only a better run raises it. A full-set hit
//! therefore outranks every fallback hit, even when none of its snippets holds a complete
//! run. The gap penalty is `n` per gap in both kinds of round.

use booksearch_query::{SearchTerm, TermSet};
use serde::Serialize;

use crate::{
    distance::estimate,
    markup::{Markers, Token, tokenize},
};

/// Which kind of round produced the snippets being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    /// Every original term is present.
    Full,
    /// Exactly one original term was omitted.
    Partial,
}

/// Scoring constants for one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Number of terms in the original query; also the per-gap penalty.
    max_terms: usize,
    /// Score of a hit with no better run.
    floor: f64,
    /// Score of a perfect run in this round.
    max_score: f64,
}

impl Baseline {
    /// Computes the baseline for a round scoring `round_terms` terms.
    pub fn new(round_terms: usize, kind: RoundKind) -> Self {
        let max_terms = match kind {
            RoundKind::Full => round_terms,
            RoundKind::Partial => round_terms + 1,
        };
        let ceiling = (max_terms * max_terms + 1) as f64;
        let (floor, max_score) = match kind {
            RoundKind::Full => (ceiling + 1.0, 2.0 * ceiling),
            RoundKind::Partial => (0.0, ceiling),
        };
        Self {
            max_terms,
            floor,
            max_score,
        }
    }

    /// Returns the original query's term count.
    pub fn max_terms(&self) -> usize {
        self.max_terms
    }

    /// Returns the score a hit keeps when no run beats it.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Returns the highest score reachable in this round.
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Scores a complete run with the given penalties.
    fn candidate(&self, run: Run) -> f64 {
        self.max_score - run.gaps as f64 * self.max_terms as f64 - run.fuzziness
    }
}

/// Penalties accumulated by a complete run.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    /// Unhighlighted words between the first and last matched term.
    gaps: usize,
    /// Sum of per-term distance / allowance.
    fuzziness: f64,
}

/// Result of scoring one hit's snippets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnippetScore {
    /// Best score across snippets, or the round floor if no run beat it.
    pub score: f64,
    /// Index of the snippet that produced `score`; `None` when `score` is the floor.
    pub best: Option<usize>,
}

/// Scores highlighted snippets against a round's terms.
#[derive(Debug, Clone, Default)]
pub struct SnippetScorer {
    /// Markers delimiting highlighted spans.
    markers: Markers,
}

impl SnippetScorer {
    /// Creates a scorer for snippets delimited by `markers`.
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    /// Returns the markers this scorer recognises.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Scores a hit's snippets and returns the best run.
    ///
    /// Snippets are consumed lazily; scanning stops as soon as a snippet reaches the
    /// round's maximum score.
    pub fn score<I, S>(&self, snippets: I, terms: &TermSet, kind: RoundKind) -> SnippetScore
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if terms.is_empty() {
            return SnippetScore {
                score: 0.0,
                best: None,
            };
        }

        let baseline = Baseline::new(terms.len(), kind);
        let mut best = SnippetScore {
            score: baseline.floor(),
            best: None,
        };

        for (index, snippet) in snippets.into_iter().enumerate() {
            let tokens = tokenize(snippet.as_ref(), &self.markers);
            let Some(run) = scan_run(&tokens, terms) else {
                continue;
            };

            let candidate = baseline.candidate(run);
            if candidate > best.score {
                best = SnippetScore {
                    score: candidate,
                    best: Some(index),
                };
                if candidate >= baseline.max_score() {
                    break;
                }
            }
        }

        best
    }
}

/// Scans tokens for the first complete in-order run of `terms`.
///
/// Matched tokens are assigned to terms positionally. Returns `None` when the snippet ends
/// before every term has been matched.
fn scan_run(tokens: &[Token], terms: &TermSet) -> Option<Run> {
    let mut word_num = 0;
    let mut gaps = 0;
    let mut fuzziness = 0.0;

    for token in tokens {
        match token {
            Token::Plain(_) => {
                if word_num > 0 {
                    gaps += 1;
                }
            }
            Token::Match(word) => {
                let term = terms.get(word_num)?;
                fuzziness += fuzz_penalty(word, term);
                word_num += 1;
                if word_num == terms.len() {
                    return Some(Run { gaps, fuzziness });
                }
            }
        }
    }

    None
}

/// Returns the matched word's distance relative to the term's allowance.
fn fuzz_penalty(word: &str, term: &SearchTerm) -> f64 {
    let allowance = term.max_fuzziness();
    if allowance == 0 {
        return 0.0;
    }
    f64::from(estimate(word, term.text())) / f64::from(allowance)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use booksearch_query::split_terms;

    use super::*;

    fn score(snippets: &[&str], query: &str, kind: RoundKind) -> SnippetScore {
        let terms = split_terms(query).unwrap();
        SnippetScorer::default().score(snippets.iter().copied(), &terms, kind)
    }

    #[test]
    fn baseline_values() {
        let full = Baseline::new(3, RoundKind::Full);
        assert_eq!(full.max_terms(), 3);
        assert_eq!(full.floor(), 11.0);
        assert_eq!(full.max_score(), 20.0);

        let partial = Baseline::new(2, RoundKind::Partial);
        assert_eq!(partial.max_terms(), 3);
        assert_eq!(partial.floor(), 0.0);
        assert_eq!(partial.max_score(), 10.0);
    }

    #[test]
    fn full_set_floor_exceeds_partial_maximum() {
        for n in 2..=12 {
            let full = Baseline::new(n, RoundKind::Full);
            let partial = Baseline::new(n - 1, RoundKind::Partial);
            assert!(
                full.floor() > partial.max_score(),
                "ordering broken for {n} terms"
            );
            assert!(full.max_score() > full.floor());
        }
    }

    #[test]
    fn exact_contiguous_match_scores_maximum() {
        let result = score(
            &["the <em>old</em> <em>man</em> <em>sea</em>"],
            "old man sea",
            RoundKind::Full,
        );
        assert_eq!(result.score, Baseline::new(3, RoundKind::Full).max_score());
        assert_eq!(result.best, Some(0));
    }

    #[test]
    fn gaps_cost_term_count_each() {
        let result = score(
            &["the <em>old</em> <em>man</em> and the <em>sea</em>"],
            "old man sea",
            RoundKind::Full,
        );
        // two gaps at three each
        assert_eq!(result.score, 20.0 - 2.0 * 3.0);
    }

    #[test]
    fn words_before_the_run_are_not_gaps() {
        let result = score(
            &["once upon a time <em>old</em> <em>sea</em>"],
            "old sea",
            RoundKind::Full,
        );
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn fuzziness_is_relative_to_allowance() {
        // "sailro" is one edit from "sailor", which allows one edit
        let result = score(&["<em>old</em> <em>sailro</em>"], "old sailor", RoundKind::Full);
        assert_eq!(result.score, 10.0 - 1.0);

        // "mariners" is one edit from "mariner" (7 chars, allowance 1)
        let result = score(&["<em>mariners</em>"], "mariner", RoundKind::Partial);
        assert_eq!(result.score, 5.0 - 1.0);

        // "albatrosses" is two edits or more from "albatross" (allowance 2)
        let result = score(&["<em>albatrosses</em>"], "albatross", RoundKind::Partial);
        assert_eq!(result.score, 5.0 - 1.0);
    }

    #[test]
    fn exact_terms_never_pay_fuzziness() {
        // "cat" has no allowance; whatever the backend highlighted costs nothing
        let result = score(&["<em>bat</em>"], "cat", RoundKind::Full);
        assert_eq!(result.score, 4.0);
    }

    #[test]
    fn incomplete_run_keeps_round_floor() {
        let result = score(&["the <em>old</em> man"], "old man sea", RoundKind::Full);
        assert_eq!(result.score, 11.0);
        assert_eq!(result.best, None);

        let result = score(&["the <em>old</em> man"], "old sea", RoundKind::Partial);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best, None);
    }

    #[test]
    fn run_split_across_fragments_keeps_round_floor() {
        let result = score(
            &["the old <em>ancient</em>", "<em>mariner</em> sailed on"],
            "ancient mariner",
            RoundKind::Full,
        );
        assert_eq!(result.score, 6.0);
        assert_eq!(result.best, None);
    }

    #[test]
    fn penalties_never_drop_below_floor() {
        // positional assignment pairs each word with the wrong term
        let result = score(
            &["<em>mariner</em> the <em>ancient</em> <em>mariner</em>"],
            "ancient mariner",
            RoundKind::Full,
        );
        assert_eq!(result.score, 6.0);
        assert_eq!(result.best, None);
    }

    #[test]
    fn snippet_without_matches_is_discarded() {
        let result = score(&["nothing highlighted here"], "old sea", RoundKind::Partial);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best, None);
    }

    #[test]
    fn best_snippet_wins() {
        let result = score(
            &[
                "<em>old</em> a b c <em>sea</em>",
                "<em>old</em> a <em>sea</em>",
                "<em>old</em>",
            ],
            "old sea",
            RoundKind::Full,
        );
        assert_eq!(result.score, 10.0 - 2.0);
        assert_eq!(result.best, Some(1));
    }

    #[test]
    fn scanning_stops_after_the_run_completes() {
        // trailing words after the last term are not gaps
        let result = score(
            &["<em>old</em> <em>sea</em> and more words"],
            "old sea",
            RoundKind::Full,
        );
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn short_circuits_at_maximum() {
        let terms = split_terms("old sea").unwrap();
        let consumed = Cell::new(0);
        let snippets = [
            "<em>old</em> <em>sea</em>",
            "<em>old</em> x <em>sea</em>",
            "unused",
        ];
        let iter = snippets.iter().inspect(|_| consumed.set(consumed.get() + 1));

        let result = SnippetScorer::default().score(iter, &terms, RoundKind::Full);

        assert_eq!(result.score, 10.0);
        assert_eq!(consumed.get(), 1);
    }

    #[test]
    fn partial_round_uses_original_term_count() {
        // original query had three terms; this round dropped one
        let result = score(&["<em>old</em> and <em>sea</em>"], "old sea", RoundKind::Partial);
        assert_eq!(result.score, 10.0 - 3.0);
    }

    #[test]
    fn misspelled_term_scores_below_exact() {
        let snippet = ["the <em>old</em> <em>man</em> and the <em>sea</em>"];
        let exact = score(&snippet, "old man sea", RoundKind::Full);
        let typo = score(&snippet, "oldd man sea", RoundKind::Full);
        assert!(typo.score < exact.score);
        assert_eq!(exact.score - typo.score, 1.0);
    }

    #[test]
    fn idempotent() {
        let snippets = ["a <em>old</em> b <em>sea</em>", "<em>old</em> <em>see</em>"];
        let first = score(&snippets, "old sea", RoundKind::Partial);
        let second = score(&snippets, "old sea", RoundKind::Partial);
        assert_eq!(first, second);
    }
}
