//! Surface-form expansion of catalog names.
//!
//! Labels such as `"Betamethasone Cream/Ointment"` compress several products
//! into one entry. Expansion materializes each implied full name
//! (`"betamethasone cream"`, `"betamethasone ointment"`) plus the bare
//! segments, so any one of them can be found in noisy text.

use crate::normalize::{is_separator, split_words};
use std::collections::BTreeSet;

/// Expand a catalog name into its lowercase candidate strings.
///
/// # Arguments
/// * `name` - Canonical catalog name, possibly slash-compound
///
/// # Returns
/// Ordered set of variants; empty only when `name` is blank.
///
/// # Example
/// ```
/// use medinstruct_search::expand_variants;
///
/// let variants = expand_variants("Betamethasone Cream/Ointment");
/// assert!(variants.contains("betamethasone cream"));
/// assert!(variants.contains("betamethasone ointment"));
/// assert!(variants.contains("ointment"));
/// ```
pub fn expand_variants(name: &str) -> BTreeSet<String> {
    let name = name.trim_matches(is_separator);
    let mut variants = BTreeSet::new();
    if name.is_empty() {
        return variants;
    }

    variants.insert(name.to_lowercase());

    if !name.contains('/') {
        return variants;
    }

    let segments: Vec<&str> = name
        .split('/')
        .map(|s| s.trim_matches(is_separator))
        .collect();

    for segment in segments.iter().filter(|s| !s.is_empty()) {
        variants.insert(segment.to_lowercase());
    }

    // "Betamethasone Cream" -> "Betamethasone"; a one-word segment is its own core
    let first_words: Vec<&str> = split_words(segments[0]).collect();
    let core = match first_words.as_slice() {
        [] => return variants,
        [only] => (*only).to_string(),
        [head @ .., _] => head.join(" "),
    };

    for &segment in &segments {
        let last = split_words(segment).last().unwrap_or(segment);
        let combined = format!("{} {}", core, last);
        variants.insert(combined.trim_matches(is_separator).to_lowercase());
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(expand_variants("  Tacrolimus Ointment "), sorted(&["tacrolimus ointment"]));
    }

    #[test]
    fn test_blank_name() {
        assert!(expand_variants("").is_empty());
        assert!(expand_variants("   ").is_empty());
    }

    #[test]
    fn test_compound_name() {
        assert_eq!(
            expand_variants("Betamethasone Cream/Ointment"),
            sorted(&[
                "betamethasone cream/ointment",
                "betamethasone cream",
                "ointment",
                "betamethasone ointment",
            ])
        );
    }

    #[test]
    fn test_single_word_first_segment_is_core() {
        assert_eq!(
            expand_variants("Ketoconazole/Shampoo"),
            sorted(&[
                "ketoconazole/shampoo",
                "ketoconazole",
                "shampoo",
                "ketoconazole ketoconazole",
                "ketoconazole shampoo",
            ])
        );
    }

    #[test]
    fn test_multi_word_core() {
        let variants = expand_variants("Clobetasol Propionate Cream / Scalp Solution");
        assert!(variants.contains("clobetasol propionate cream"));
        assert!(variants.contains("scalp solution"));
        assert!(variants.contains("clobetasol propionate solution"));
    }

    #[test]
    fn test_empty_segment_reuses_core_alone() {
        let variants = expand_variants("Fusidic Acid Cream//Gel");
        assert!(variants.contains("fusidic acid"));
        assert!(variants.contains("fusidic acid gel"));
        assert!(!variants.contains(""));
    }

    #[test]
    fn test_empty_first_segment_skips_reconstruction() {
        assert_eq!(expand_variants("/Cream"), sorted(&["/cream", "cream"]));
    }

    #[test]
    fn test_ascii_separators_split_words() {
        assert_eq!(
            expand_variants("Mometasone\u{1f}Cream/Ointment\u{1c}"),
            sorted(&[
                "mometasone cream",
                "mometasone ointment",
                "mometasone\u{1f}cream",
                "mometasone\u{1f}cream/ointment",
                "ointment",
            ])
        );
    }
}
