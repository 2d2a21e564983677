//! The matching entry points.

use crate::catalog::{CatalogProvider, CatalogSnapshot};
use crate::normalize::normalize;
use crate::ranking::{rank, ScoredEntry};
use crate::scoring::{score_entry, score_profile, NameProfile};
use crate::MatchResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Cutoff and size bound for one match call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum final score in `[0, 1]`
    pub cutoff: f64,
    /// Maximum number of results
    pub max_results: usize,
}

impl MatchOptions {
    /// Recall-oriented cutoff used for OCR and typed searches.
    pub const RECALL_CUTOFF: f64 = 0.25;
    /// Precision-oriented cutoff.
    pub const STRICT_CUTOFF: f64 = 0.6;
    /// Default result bound.
    pub const DEFAULT_MAX_RESULTS: usize = 10;

    /// Creates options with explicit values.
    pub fn new(cutoff: f64, max_results: usize) -> Self {
        Self { cutoff, max_results }
    }

    /// Low cutoff favouring recall against noisy text.
    pub fn recall() -> Self {
        Self::new(Self::RECALL_CUTOFF, Self::DEFAULT_MAX_RESULTS)
    }

    /// Higher cutoff favouring precision.
    pub fn strict() -> Self {
        Self::new(Self::STRICT_CUTOFF, Self::DEFAULT_MAX_RESULTS)
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::recall()
    }
}

/// Match free text against a catalog snapshot.
///
/// # Arguments
/// * `text` - Raw query or OCR text; empty text gives no results
/// * `catalog` - Snapshot to search
/// * `cutoff` - Minimum final score
/// * `max_results` - Result bound
///
/// # Returns
/// Results ordered by score descending, then name ascending.
///
/// # Example
/// ```
/// use medinstruct_search::{match_catalog, CatalogEntry, CatalogSnapshot};
///
/// let catalog = CatalogSnapshot::from_entries(vec![CatalogEntry::new(
///     "Betamethasone Cream/Ointment",
///     "Apply thin layer twice daily",
/// )]);
///
/// let results = match_catalog("apply betamethasone cream twice daily", &catalog, 0.25, 10);
/// assert_eq!(results[0].matched_variant, "betamethasone cream");
/// assert_eq!(results[0].score, 1.0);
/// ```
#[instrument(skip(text, catalog), fields(entries = catalog.len()))]
pub fn match_catalog(
    text: &str,
    catalog: &CatalogSnapshot,
    cutoff: f64,
    max_results: usize,
) -> Vec<MatchResult> {
    let normalized = normalize(text);
    if normalized.is_empty() || max_results == 0 {
        debug!("Empty query, nothing to match");
        return Vec::new();
    }

    let entries: Vec<(&str, &str)> = catalog.iter().collect();
    let scored = score_all(&entries, |&(name, payload)| {
        score_entry(name, &normalized).map(|score| ScoredEntry { name, payload, score })
    });

    finish(scored, catalog.len(), cutoff, max_results)
}

/// Catalog with every name's tokens and variants computed up front.
///
/// Produces the same results as [`match_catalog`] on the snapshot it was
/// built from; useful when many queries run against one snapshot.
#[derive(Debug, Clone)]
pub struct PreparedCatalog {
    entries: Vec<PreparedEntry>,
}

#[derive(Debug, Clone)]
struct PreparedEntry {
    profile: NameProfile,
    payload: String,
}

impl PreparedCatalog {
    /// Prepare every non-blank entry of `catalog`.
    pub fn new(catalog: &CatalogSnapshot) -> Self {
        let entries = catalog
            .iter()
            .filter_map(|(name, payload)| {
                NameProfile::new(name).map(|profile| PreparedEntry {
                    profile,
                    payload: payload.to_string(),
                })
            })
            .collect();

        Self { entries }
    }

    /// Number of prepared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was prepared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match free text against the prepared entries.
    #[instrument(skip(self, text), fields(entries = self.entries.len()))]
    pub fn match_text(&self, text: &str, cutoff: f64, max_results: usize) -> Vec<MatchResult> {
        let normalized = normalize(text);
        if normalized.is_empty() || max_results == 0 {
            debug!("Empty query, nothing to match");
            return Vec::new();
        }

        let scored = score_all(&self.entries, |entry| {
            score_profile(&entry.profile, &normalized).map(|score| ScoredEntry {
                name: &entry.profile.name,
                payload: &entry.payload,
                score,
            })
        });

        finish(scored, self.entries.len(), cutoff, max_results)
    }
}

/// Matcher bound to a catalog provider.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Matcher<P> {
    provider: P,
}

impl<P: CatalogProvider> Matcher<P> {
    /// Creates a matcher over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Borrow the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Match free text against the provider's current snapshot.
    pub fn match_text(&self, text: &str, cutoff: f64, max_results: usize) -> Vec<MatchResult> {
        let snapshot = self.provider.snapshot();
        match_catalog(text, &snapshot, cutoff, max_results)
    }

    /// Match using an options bundle.
    pub fn match_with(&self, text: &str, options: &MatchOptions) -> Vec<MatchResult> {
        self.match_text(text, options.cutoff, options.max_results)
    }
}

/// Score every item, in parallel when enabled; output order follows input order.
fn score_all<'a, T, F>(items: &'a [T], score: F) -> Vec<ScoredEntry<'a>>
where
    T: Sync,
    F: Fn(&'a T) -> Option<ScoredEntry<'a>> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().filter_map(score).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().filter_map(score).collect()
    }
}

fn finish(
    scored: Vec<ScoredEntry<'_>>,
    considered: usize,
    cutoff: f64,
    max_results: usize,
) -> Vec<MatchResult> {
    let gated = scored.len();
    let results = rank(scored, cutoff, max_results);
    debug!(considered, gated, kept = results.len(), "Match complete");
    results
}
