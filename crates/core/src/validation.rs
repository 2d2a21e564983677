//! Configuration and input validation
//!
//! Provides validation for:
//! - Catalog entries entered by users
//! - Configuration values
//!
//! # Example
//!
//! ```rust
//! use medinstruct_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "Mometasone Cream")
//!     .max_length("name", "Mometasone Cream", 200)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of a catalog name, in characters
pub const MAX_NAME_CHARS: usize = 200;

static SINGLE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\r\n]*$").expect("valid regex"));

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not blank
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate maximum length in characters
    pub fn max_length(mut self, field: &str, value: &str, max: usize) -> Self {
        let len = value.chars().count();
        if len > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be at most {} characters", max),
                code: "MAX_LENGTH".to_string(),
                expected: Some(format!("<= {} chars", max)),
                actual: Some(format!("{} chars", len)),
            });
        }
        self
    }

    /// Validate that a value has no line breaks
    pub fn single_line(mut self, field: &str, value: &str) -> Self {
        if !SINGLE_LINE.is_match(value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Must be a single line".to_string(),
                code: "SINGLE_LINE".to_string(),
                expected: Some("no line breaks".to_string()),
                actual: Some(format!("{} lines", value.lines().count())),
            });
        }
        self
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be one of: {}", allowed.join(", ")),
                code: "ONE_OF".to_string(),
                expected: Some(allowed.join(", ")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate a numeric range (inclusive)
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        // written so NaN fails too
        if !(value >= min && value <= max) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {} and {}", min, max),
                code: "RANGE".to_string(),
                expected: Some(format!("{} - {}", min, max)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Validate a catalog name and its instructions before storing them
pub fn validate_catalog_entry(name: &str, instructions: &str) -> ValidationResult {
    Validator::new()
        .required("name", name)
        .max_length("name", name.trim(), MAX_NAME_CHARS)
        .single_line("name", name.trim())
        .required("instructions", instructions)
        .validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("name", "   ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_max_length_counts_chars() {
        // 3 chars, 6 bytes
        let result = Validator::new().max_length("name", "äöü", 3).validate();
        assert!(result.is_valid());

        let result = Validator::new()
            .max_length("name", "abcdefghijk", 5)
            .validate();
        assert_eq!(result.errors()[0].code, "MAX_LENGTH");
    }

    #[test]
    fn test_single_line_validation() {
        let result = Validator::new()
            .single_line("name", "Mometasone\nCream")
            .validate();
        assert_eq!(result.errors()[0].code, "SINGLE_LINE");
    }

    #[test]
    fn test_one_of_validation() {
        let result = Validator::new()
            .one_of("format", "pretty", &["compact", "json"])
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "ONE_OF");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("cutoff", 1.5, 0.0, 1.0).validate();
        assert_eq!(result.errors()[0].code, "RANGE");

        let result = Validator::new().range("cutoff", f64::NAN, 0.0, 1.0).validate();
        assert!(!result.is_valid());

        let result = Validator::new().range("max_results", 1000, 1, 1000).validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_warning_does_not_fail() {
        let result = Validator::new()
            .warn_if("cutoff", true, "Very low cutoff")
            .validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_catalog_entry_validation() {
        assert!(validate_catalog_entry("Hydrocortisone Cream", "Apply twice daily").is_valid());

        let result = validate_catalog_entry("", "");
        assert_eq!(result.errors().len(), 2);

        let long_name = "x".repeat(MAX_NAME_CHARS + 1);
        assert!(!validate_catalog_entry(&long_name, "text").is_valid());
    }

    #[test]
    fn test_to_result() {
        let err = validate_catalog_entry(" ", "text").to_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("name"));
    }
}
