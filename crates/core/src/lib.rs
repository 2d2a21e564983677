//! Core utilities for the medinstruct tools
//!
//! This crate provides the pieces around the matching engine:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Validation**: Fluent validator for user input and configuration values
//! - **Catalog**: File-backed drug catalog that serves engine snapshots
//! - **Sources**: Query text from arguments, OCR text files, or stdin
//!
//! # Example
//!
//! ```rust,no_run
//! use medinstruct_core::{catalog::CatalogStore, config::Config};
//! use medinstruct_search::{MatchOptions, Matcher};
//!
//! let config = Config::load(None).expect("valid configuration");
//! let store = CatalogStore::open(&config.schema.catalog.path).expect("readable catalog");
//!
//! let matcher = Matcher::new(store);
//! for result in matcher.match_with("mometasone ointment", &MatchOptions::recall()) {
//!     println!("{} ({:.3})", result.name, result.score);
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod source;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{CatalogRecord, CatalogStore};
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::source::{InlineText, StdinText, TextFile, TextSource};
    pub use crate::validation::{ValidationResult, Validator};
}
