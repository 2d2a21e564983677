//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use crate::validation::{ValidationResult, Validator};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest accepted `max_results`
pub const MAX_RESULTS_LIMIT: usize = 1000;

/// Accepted log formats
pub const LOG_FORMATS: &[&str] = &["compact", "json"];

/// Files searched, in order, when no path is given
const CANDIDATES: &[&str] = &[
    ".medinstruct.toml",
    "medinstruct.toml",
    ".config/medinstruct.toml",
];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// tried relative to the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(Path::new(".")),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        debug!(path = ?config_path, "configuration loaded");

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }

    /// Check value ranges
    pub fn validate(&self) -> ValidationResult {
        let s = &self.schema;
        Validator::new()
            .range("matching.cutoff", s.matching.cutoff, 0.0, 1.0)
            .range("matching.strict_cutoff", s.matching.strict_cutoff, 0.0, 1.0)
            .range("matching.max_results", s.matching.max_results, 1, MAX_RESULTS_LIMIT)
            .required("catalog.path", &s.catalog.path)
            .range("input.max_text_bytes", s.input.max_text_bytes, 1, usize::MAX)
            .required("logging.level", &s.logging.level)
            .one_of("logging.format", &s.logging.format, LOG_FORMATS)
            .warn_if(
                "matching.strict_cutoff",
                s.matching.strict_cutoff < s.matching.cutoff,
                "strict_cutoff is lower than cutoff",
            )
            .validate()
    }

    /// Validate and convert failures into a configuration error
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate().to_result().map_err(|e| {
            let mut err = Error::new(ErrorCode::ConfigValidationError, e.message);
            if let Some(path) = &self.path {
                err = err.with_context(format!("In {}", path.display()));
            }
            err
        })
    }

    /// Effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(&self.schema)
            .map_err(|e| Error::config(format!("Failed to serialize configuration: {}", e)))
    }
}

/// Find configuration file in standard locations under `root`
fn find_config_file(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))?;
    Ok(schema)
}
