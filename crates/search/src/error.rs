//! Error types for the search crate.
//!
//! Matching itself never fails; these only cover building snapshots from
//! serialized input.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while loading catalog data.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Well-formed input with the wrong shape
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Malformed JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
