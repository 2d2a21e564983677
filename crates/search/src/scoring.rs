//! Per-entry candidate scoring.
//!
//! An entry is scored in two stages. The keyword gate requires at least one
//! core token of the name to appear verbatim in the query; only entries that
//! pass it pay for the similarity computation over their variants.

use crate::forms::{core_tokens, is_form_word, name_tokens};
use crate::normalize::{is_separator, split_words, NormalizedText};
use crate::similarity::similarity_ratio;
use crate::variants::expand_variants;
use std::collections::BTreeSet;

/// Weight applied to the token overlap signal.
pub const OVERLAP_WEIGHT: f64 = 0.9;

/// Weight applied to the keyword ratio signal.
pub const KEYWORD_WEIGHT: f64 = 0.85;

/// Scores at or above this stop the variant scan.
pub const EARLY_EXIT_SCORE: f64 = 0.999;

/// One candidate surface string and its distinct words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Lowercase candidate string
    pub text: String,
    /// Distinct whitespace-separated words of `text`
    pub tokens: BTreeSet<String>,
}

impl Variant {
    fn new(text: String) -> Self {
        let tokens = split_words(&text).map(String::from).collect();
        Self { text, tokens }
    }

    /// A lone form word such as `"cream"` never matches on its own.
    fn is_bare_form(&self) -> bool {
        self.tokens.len() == 1 && self.tokens.iter().all(|t| is_form_word(t))
    }
}

/// Query-independent breakdown of one catalog name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameProfile {
    /// Catalog name as supplied
    pub name: String,
    /// Identifying tokens used by the keyword gate
    pub core_tokens: BTreeSet<String>,
    /// Scorable variants in lexicographic order (bare forms removed)
    pub variants: Vec<Variant>,
}

impl NameProfile {
    /// Build the profile for `name`.
    ///
    /// Returns `None` for blank names, which are skipped silently.
    pub fn new(name: &str) -> Option<Self> {
        if name.trim_matches(is_separator).is_empty() {
            return None;
        }

        let tokens = name_tokens(&name.to_lowercase());
        let core_tokens = core_tokens(&tokens);

        let variants = expand_variants(name)
            .into_iter()
            .map(Variant::new)
            .filter(|v| !v.is_bare_form())
            .collect();

        Some(Self {
            name: name.to_string(),
            core_tokens,
            variants,
        })
    }
}

/// Outcome of scoring one entry against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryScore {
    /// Best combined score over all variants
    pub best_score: f64,
    /// Variant that produced `best_score`
    pub best_variant: String,
    /// Fraction of core tokens found verbatim in the query
    pub keyword_ratio: f64,
    /// Core tokens found verbatim in the query
    pub matched_tokens: BTreeSet<String>,
}

/// Score a catalog name against normalized query text.
///
/// # Returns
/// `None` when the name is blank, shares no core token with the query, or
/// has no scorable variant.
pub fn score_entry(name: &str, text: &NormalizedText) -> Option<EntryScore> {
    NameProfile::new(name).and_then(|profile| score_profile(&profile, text))
}

/// Score a prepared profile against normalized query text.
pub fn score_profile(profile: &NameProfile, text: &NormalizedText) -> Option<EntryScore> {
    let matched_tokens: BTreeSet<String> = profile
        .core_tokens
        .iter()
        .filter(|t| text.contains_token(t))
        .cloned()
        .collect();

    if matched_tokens.is_empty() {
        return None;
    }

    let keyword_ratio = matched_tokens.len() as f64 / profile.core_tokens.len() as f64;

    let mut best: Option<(f64, &str)> = None;
    for variant in &profile.variants {
        let score = score_variant(variant, text, keyword_ratio);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, variant.text.as_str()));
        }
        if score >= EARLY_EXIT_SCORE {
            break;
        }
    }

    let (best_score, best_variant) = best?;

    Some(EntryScore {
        best_score,
        best_variant: best_variant.to_string(),
        keyword_ratio,
        matched_tokens,
    })
}

/// Combined score of one variant.
fn score_variant(variant: &Variant, text: &NormalizedText, keyword_ratio: f64) -> f64 {
    if text.joined.contains(variant.text.as_str()) {
        return 1.0;
    }

    let shared = variant
        .tokens
        .iter()
        .filter(|t| text.contains_token(t))
        .count();
    let overlap = shared as f64 / variant.tokens.len().max(1) as f64;

    let similarity = window_similarity(&variant.text, variant.tokens.len(), text)
        .max(similarity_ratio(&variant.text, &text.joined));

    similarity
        .max(overlap * OVERLAP_WEIGHT)
        .max(keyword_ratio * KEYWORD_WEIGHT)
}

/// Best ratio between `candidate` and any run of `width` consecutive query tokens.
///
/// A query shorter than `width` is compared as a single window.
fn window_similarity(candidate: &str, width: usize, text: &NormalizedText) -> f64 {
    let width = width.max(1);
    let count = text.tokens.len();
    let starts = (count + 1).saturating_sub(width).max(1);

    (0..starts)
        .map(|start| {
            let end = (start + width).min(count);
            let window = text.tokens[start..end].join(" ");
            similarity_ratio(candidate, &window)
        })
        .fold(0.0, f64::max)
}
