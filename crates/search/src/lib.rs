//! Fuzzy drug-name matching for medication instructions.
//!
//! Finds which catalog entries plausibly appear in noisy free text (OCR
//! output or a typed query) and ranks them with a confidence score.
//!
//! This crate provides:
//! - Query normalization and form-word classification
//! - Variant expansion of slash-compound names
//! - Keyword-gated candidate scoring with windowed block similarity
//! - Deterministic ranking under a cutoff
//!
//! # Example
//!
//! ```
//! use medinstruct_search::{CatalogEntry, CatalogSnapshot, MatchOptions, Matcher};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(CatalogSnapshot::from_entries(vec![
//!     CatalogEntry::new("Tacrolimus Ointment", "Apply twice daily"),
//!     CatalogEntry::new("Mometasone Cream/Ointment", "Apply once daily"),
//! ]));
//!
//! let matcher = Matcher::new(catalog);
//! let results = matcher.match_with("mometasone ointment 0.1%", &MatchOptions::recall());
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].name, "Mometasone Cream/Ointment");
//! ```

mod catalog;
mod error;
mod forms;
mod matcher;
mod normalize;
mod ranking;
mod scoring;
mod similarity;
mod variants;

#[cfg(feature = "wasm")]
mod wasm;

pub use catalog::{CatalogEntry, CatalogProvider, CatalogSnapshot};
pub use error::{Result, SearchError};
pub use forms::{core_tokens, is_form_word, name_tokens, FORM_WORDS};
pub use matcher::{match_catalog, MatchOptions, Matcher, PreparedCatalog};
pub use normalize::{normalize, NormalizedText, TOKEN_PUNCTUATION};
pub use ranking::{final_score, rank, round_score, ScoredEntry};
pub use scoring::{score_entry, score_profile, EntryScore, NameProfile, Variant};
pub use similarity::similarity_ratio;
pub use variants::expand_variants;

/// One ranked catalog entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Catalog name
    pub name: String,
    /// Variant that produced the best score
    pub matched_variant: String,
    /// Catalog payload, untouched
    pub payload: String,
    /// Final score rounded to three decimals
    pub score: f64,
}
