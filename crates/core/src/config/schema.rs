//! Configuration schema definitions

use medinstruct_search::MatchOptions;
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Matching thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum score for a result to be kept
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,

    /// Cutoff used with `--strict`
    #[serde(default = "default_strict_cutoff")]
    pub strict_cutoff: f64,

    /// Maximum number of results returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            strict_cutoff: default_strict_cutoff(),
            max_results: default_max_results(),
        }
    }
}

fn default_cutoff() -> f64 {
    MatchOptions::RECALL_CUTOFF
}

fn default_strict_cutoff() -> f64 {
    MatchOptions::STRICT_CUTOFF
}

fn default_max_results() -> usize {
    MatchOptions::DEFAULT_MAX_RESULTS
}

/// Catalog store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the JSON catalog file
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "drug_catalog.json".to_string()
}

/// Input limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Largest accepted text, in bytes
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

fn default_max_text_bytes() -> usize {
    10 * 1024 * 1024
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,

    /// `compact` or `json`
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "compact".to_string()
}
