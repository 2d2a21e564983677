//! Generic pharmaceutical form vocabulary.
//!
//! Form words describe how a product is delivered, not which product it is.
//! They are split off catalog names so that only the identifying ("core")
//! tokens gate a match.

use crate::normalize::is_separator;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

/// Fixed vocabulary of generic form words.
pub const FORM_WORDS: &[&str] = &[
    "cream",
    "gel",
    "ointment",
    "shampoo",
    "syrup",
    "tablet",
    "capsule",
    "solution",
    "ointment/cream",
    "ointment/gel",
];

static FORMS: Lazy<HashSet<&'static str>> = Lazy::new(|| FORM_WORDS.iter().copied().collect());

/// Returns true if `token` is a generic form word.
#[inline]
pub fn is_form_word(token: &str) -> bool {
    FORMS.contains(token)
}

/// Split a lowercased catalog name into its token set.
///
/// Splits on whitespace, `/` and `,`, dropping empty pieces.
pub fn name_tokens(name_lower: &str) -> BTreeSet<String> {
    name_lower
        .split(|c: char| is_separator(c) || c == '/' || c == ',')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Return the tokens that are not form words.
///
/// Falls back to the full set when every token is a form word, so an
/// all-form name still has something to gate on.
pub fn core_tokens(tokens: &BTreeSet<String>) -> BTreeSet<String> {
    let core: BTreeSet<String> = tokens
        .iter()
        .filter(|t| !is_form_word(t))
        .cloned()
        .collect();

    if core.is_empty() {
        tokens.clone()
    } else {
        core
    }
}
