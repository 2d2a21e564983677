//! Query text normalization.

use std::collections::HashSet;

/// Characters trimmed from both ends of every whitespace-separated piece.
pub const TOKEN_PUNCTUATION: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '/', '%', '"', '\''];

/// Word separators: Unicode whitespace plus the ASCII file, group, record
/// and unit separators (`U+001C..=U+001F`), which OCR dumps occasionally
/// carry between fields.
#[inline]
pub(crate) fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Split on runs of separators, skipping empty pieces.
pub(crate) fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|piece| !piece.is_empty())
}

/// Lowercased, punctuation-trimmed view of a query.
///
/// Built once per match call and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Surviving tokens in input order
    pub tokens: Vec<String>,
    /// Tokens re-joined with single spaces
    pub joined: String,
    token_set: HashSet<String>,
}

impl NormalizedText {
    /// Returns true if the query produced no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true if `token` appears verbatim among the query tokens.
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_set.contains(token)
    }
}

/// Normalize raw text into tokens and a joined string.
///
/// # Arguments
/// * `text` - Raw OCR output or user input, possibly empty
///
/// # Returns
/// The normalized view; empty input gives empty tokens and an empty `joined`.
pub fn normalize(text: &str) -> NormalizedText {
    let lowered = text.to_lowercase();

    let tokens: Vec<String> = split_words(&lowered)
        .map(|piece| piece.trim_matches(TOKEN_PUNCTUATION))
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect();

    let joined = tokens.join(" ");
    let token_set = tokens.iter().cloned().collect();

    NormalizedText {
        tokens,
        joined,
        token_set,
    }
}
