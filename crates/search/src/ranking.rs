//! Final scoring, filtering and ordering of matched entries.

use crate::scoring::EntryScore;
use crate::MatchResult;
use std::cmp::Ordering;

/// Floor applied when every core token of a name is present.
pub const FULL_COVERAGE_FLOOR: f64 = 0.95;

/// Keyword ratio from which the partial coverage floor applies.
pub const PARTIAL_COVERAGE_RATIO: f64 = 0.8;

/// Floor applied when most core tokens are present.
pub const PARTIAL_COVERAGE_FLOOR: f64 = 0.85;

/// An entry that passed the keyword gate, borrowed from its snapshot.
#[derive(Debug, Clone)]
pub struct ScoredEntry<'a> {
    /// Catalog name
    pub name: &'a str,
    /// Catalog payload
    pub payload: &'a str,
    /// Scorer output
    pub score: EntryScore,
}

/// Raise the best variant score by keyword coverage.
///
/// Rewards names whose distinguishing tokens are all in the text even when
/// OCR shuffled their order.
pub fn final_score(score: &EntryScore) -> f64 {
    if score.keyword_ratio >= 1.0 {
        score.best_score.max(FULL_COVERAGE_FLOOR)
    } else if score.keyword_ratio >= PARTIAL_COVERAGE_RATIO {
        score.best_score.max(PARTIAL_COVERAGE_FLOOR)
    } else {
        score.best_score
    }
}

/// Round a score to three decimal places.
///
/// Rounds the exact binary value, with ties going to the even digit, so
/// `0.5625` becomes `0.562`.
pub fn round_score(score: f64) -> f64 {
    format!("{:.3}", score).parse().unwrap_or(score)
}

/// Turn scored entries into the ordered, bounded result list.
///
/// Keeps entries whose final score reaches `cutoff`, sorts by score
/// descending then name ascending, and truncates to `max_results`.
pub fn rank(entries: Vec<ScoredEntry<'_>>, cutoff: f64, max_results: usize) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = entries
        .into_iter()
        .filter(|e| !e.score.matched_tokens.is_empty())
        .filter_map(|e| {
            let score = final_score(&e.score);
            let rounded = round_score(score);
            if score < cutoff || rounded < cutoff {
                return None;
            }
            Some(MatchResult {
                name: e.name.to_string(),
                matched_variant: e.score.best_variant,
                payload: e.payload.to_string(),
                score: rounded,
            })
        })
        .collect();

    results.sort_by(compare_results);
    results.truncate(max_results);
    results
}

/// Score descending, then name ascending.
fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.name.cmp(&b.name))
}
