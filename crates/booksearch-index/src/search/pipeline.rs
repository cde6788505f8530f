//! Unified result pipeline.
//!
//! Turns the scored rounds of one request into the returned page.
//!
//! # Pipeline Phases
//!
//! 1. **Merge and dedupe**: concatenate rounds in planned order (full set first, then
//!    fallback rounds by omitted term) and keep the first occurrence of every id. A
//!    document found by the full-set round therefore keeps its full-set score.
//!
//! 2. **Score cap**: stable sort by descending score and keep the top `score_cap`.
//!
//! 3. **Presentation order**: rearrange the capped set by the requested [`SortOrder`].
//!    This never changes which documents survive the cap.
//!
//! 4. **Page**: skip and take.

use std::collections::HashSet;

use booksearch_query::SortOrder;

use super::{
    round::{Round, RoundOutcome},
    types::{PipelineStats, ScoredDocument},
};

/// Ranking options for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Presentation order applied after the score cap.
    pub sort: SortOrder,
    /// Documents kept by score.
    pub score_cap: usize,
    /// Documents skipped from the front of the ordered set.
    pub skip: usize,
    /// Documents returned.
    pub take: usize,
}

/// Processes scored rounds through the result pipeline.
///
/// `outcomes` must be in planned round order. Returns the page and the counts collected
/// along the way.
pub fn process_candidates(
    outcomes: Vec<RoundOutcome>,
    options: &RankOptions,
) -> (Vec<ScoredDocument>, PipelineStats) {
    let mut stats = PipelineStats::default();
    for outcome in &outcomes {
        stats.skipped_documents += outcome.skipped;
        match outcome.round {
            Round::Full => stats.full_round_hits += outcome.raw_hits,
            Round::Fallback { .. } => {
                stats.fallback_rounds += 1;
                stats.fallback_hits += outcome.raw_hits;
            }
        }
    }

    // Phase 1
    let mut documents = dedupe(outcomes.into_iter().map(|outcome| outcome.documents));
    stats.unique_documents = documents.len();

    // Phase 2
    sort_documents(&mut documents, SortOrder::Score);
    documents.truncate(options.score_cap);
    stats.capped_documents = documents.len();

    // Phase 3
    sort_documents(&mut documents, options.sort);

    // Phase 4
    let page = paginate(documents, options.skip, options.take);
    stats.returned_documents = page.len();

    (page, stats)
}

/// Concatenates batches in order, keeping the first document seen for every id.
pub fn dedupe<I>(batches: I) -> Vec<ScoredDocument>
where
    I: IntoIterator<Item = Vec<ScoredDocument>>,
{
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|doc| seen.insert(doc.id.clone()))
        .collect()
}

/// Sorts documents in place. The sort is stable, so ties keep their current order.
pub fn sort_documents(documents: &mut [ScoredDocument], order: SortOrder) {
    match order {
        SortOrder::Score => documents.sort_by(|a, b| b.score.total_cmp(&a.score)),
        // Undated documents count as oldest
        SortOrder::TimeNew => documents.sort_by(|a, b| b.released_at.cmp(&a.released_at)),
        SortOrder::TimeOld => documents.sort_by(|a, b| a.released_at.cmp(&b.released_at)),
        SortOrder::Alphabet => documents.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

/// Returns `take` documents starting at `skip`.
pub fn paginate(documents: Vec<ScoredDocument>, skip: usize, take: usize) -> Vec<ScoredDocument> {
    documents.into_iter().skip(skip).take(take).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn doc(id: &str, score: f64) -> ScoredDocument {
        ScoredDocument {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: String::new(),
            released_at: None,
            score,
            snippet: None,
        }
    }

    fn dated(id: &str, title: &str, year: Option<i32>) -> ScoredDocument {
        ScoredDocument {
            title: title.to_string(),
            released_at: year.map(|y| -> DateTime<Utc> {
                Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()
            }),
            ..doc(id, 1.0)
        }
    }

    fn ids(documents: &[ScoredDocument]) -> Vec<&str> {
        documents.iter().map(|d| d.id.as_str()).collect()
    }

    fn outcome(round: Round, documents: Vec<ScoredDocument>) -> RoundOutcome {
        RoundOutcome {
            round,
            raw_hits: documents.len(),
            skipped: 0,
            documents,
        }
    }

    fn options(sort: SortOrder, score_cap: usize, skip: usize, take: usize) -> RankOptions {
        RankOptions {
            sort,
            score_cap,
            skip,
            take,
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let merged = dedupe(vec![
            vec![doc("A", 5.0), doc("B", 4.0)],
            vec![doc("B", 9.0), doc("C", 3.0)],
        ]);

        assert_eq!(ids(&merged), vec!["A", "B", "C"]);
        assert_eq!(merged[1].score, 4.0);
    }

    #[test]
    fn dedupe_within_one_batch() {
        let merged = dedupe(vec![vec![doc("A", 1.0), doc("A", 2.0)]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score, 1.0);
    }

    #[test]
    fn empty_candidates_returns_empty() {
        let (page, stats) = process_candidates(vec![], &options(SortOrder::Score, 30, 0, 10));
        assert!(page.is_empty());
        assert_eq!(stats, PipelineStats::default());
    }

    #[test]
    fn ranks_by_score_descending() {
        let outcomes = vec![outcome(
            Round::Full,
            vec![doc("low", 1.0), doc("high", 9.0), doc("mid", 5.0)],
        )];

        let (page, _) = process_candidates(outcomes, &options(SortOrder::Score, 30, 0, 10));

        assert_eq!(ids(&page), vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_scores_keep_round_order() {
        let outcomes = vec![
            outcome(Round::Full, vec![doc("a", 2.0)]),
            outcome(Round::Fallback { omitted: 0 }, vec![doc("b", 2.0)]),
        ];

        let (page, _) = process_candidates(outcomes, &options(SortOrder::Score, 30, 0, 10));

        assert_eq!(ids(&page), vec!["a", "b"]);
    }

    #[test]
    fn full_round_score_survives_dedupe() {
        let outcomes = vec![
            outcome(Round::Full, vec![doc("A", 20.0), doc("B", 3.0)]),
            outcome(Round::Fallback { omitted: 0 }, vec![doc("B", 10.0), doc("C", 8.0)]),
        ];

        let (page, stats) = process_candidates(outcomes, &options(SortOrder::Score, 30, 0, 10));

        assert_eq!(ids(&page), vec!["A", "C", "B"]);
        assert_eq!(page[2].score, 3.0);
        assert_eq!(stats.full_round_hits, 2);
        assert_eq!(stats.fallback_rounds, 1);
        assert_eq!(stats.fallback_hits, 2);
        assert_eq!(stats.unique_documents, 3);
    }

    #[test]
    fn score_cap_applies_before_alternate_sort() {
        // "z" has the best title for alphabetical order but the worst score
        let mut docs: Vec<ScoredDocument> = (0..5)
            .map(|i| dated(&format!("d{i}"), &format!("m{i}"), None))
            .collect();
        for (i, d) in docs.iter_mut().enumerate() {
            d.score = 10.0 - i as f64;
        }
        let mut worst = dated("z", "a-first-alphabetically", None);
        worst.score = 0.5;
        docs.push(worst);

        let (page, stats) = process_candidates(
            vec![outcome(Round::Full, docs)],
            &options(SortOrder::Alphabet, 5, 0, 10),
        );

        assert_eq!(stats.unique_documents, 6);
        assert_eq!(stats.capped_documents, 5);
        assert!(!ids(&page).contains(&"z"));
        assert_eq!(ids(&page), vec!["d0", "d1", "d2", "d3", "d4"]);
    }

    #[test]
    fn sort_time_new_puts_undated_last() {
        let mut docs = vec![
            dated("none", "x", None),
            dated("old", "x", Some(1851)),
            dated("new", "x", Some(1952)),
        ];
        sort_documents(&mut docs, SortOrder::TimeNew);
        assert_eq!(ids(&docs), vec!["new", "old", "none"]);
    }

    #[test]
    fn sort_time_old_puts_undated_first() {
        let mut docs = vec![
            dated("new", "x", Some(1952)),
            dated("none", "x", None),
            dated("old", "x", Some(1851)),
        ];
        sort_documents(&mut docs, SortOrder::TimeOld);
        assert_eq!(ids(&docs), vec!["none", "old", "new"]);
    }

    #[test]
    fn sort_alphabet_by_title() {
        let mut docs = vec![
            dated("1", "Moby Dick", None),
            dated("2", "Billy Budd", None),
            dated("3", "Typee", None),
        ];
        sort_documents(&mut docs, SortOrder::Alphabet);
        assert_eq!(ids(&docs), vec!["2", "1", "3"]);
    }

    #[test]
    fn pagination_slices_ranked_order() {
        let docs: Vec<ScoredDocument> = (0..12_u32)
            .map(|i| doc(&format!("d{i}"), 100.0 - f64::from(i)))
            .collect();

        let (all, _) = process_candidates(
            vec![outcome(Round::Full, docs.clone())],
            &options(SortOrder::Score, 30, 0, 30),
        );
        let (first, _) = process_candidates(
            vec![outcome(Round::Full, docs.clone())],
            &options(SortOrder::Score, 30, 0, 5),
        );
        let (second, stats) = process_candidates(
            vec![outcome(Round::Full, docs)],
            &options(SortOrder::Score, 30, 5, 5),
        );

        assert_eq!(first.len(), 5);
        assert_eq!(first, all[..5]);
        assert_eq!(second, all[5..10]);
        assert_eq!(stats.returned_documents, 5);
    }

    #[test]
    fn skip_past_end_is_empty() {
        let (page, _) = process_candidates(
            vec![outcome(Round::Full, vec![doc("a", 1.0)])],
            &options(SortOrder::Score, 30, 5, 10),
        );
        assert!(page.is_empty());
    }

    #[test]
    fn take_larger_than_cap_returns_capped_set() {
        let docs: Vec<ScoredDocument> = (0..40).map(|i| doc(&format!("d{i}"), i as f64)).collect();

        let (page, _) = process_candidates(
            vec![outcome(Round::Full, docs)],
            &options(SortOrder::Score, 30, 0, 100),
        );

        assert_eq!(page.len(), 30);
    }

    #[test]
    fn skipped_documents_are_counted() {
        let mut full = outcome(Round::Full, vec![doc("a", 1.0)]);
        full.raw_hits = 3;
        full.skipped = 2;

        let (_, stats) = process_candidates(vec![full], &options(SortOrder::Score, 30, 0, 10));

        assert_eq!(stats.full_round_hits, 3);
        assert_eq!(stats.skipped_documents, 2);
    }
}
