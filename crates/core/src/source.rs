//! Where query text comes from
//!
//! Matching works on plain text. A source is either typed by the user,
//! stored on disk after an external OCR pass, or piped in on stdin.

use crate::error::{Error, ErrorCode, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default limit on extracted text
pub const DEFAULT_MAX_TEXT_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted by [`TextFile`]
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "ocr"];

/// A producer of query text
pub trait TextSource {
    /// Produce the full text
    fn extract_text(&self) -> Result<String>;

    /// Short label for logs and headers
    fn describe(&self) -> String;
}

/// Text supplied directly
#[derive(Debug, Clone)]
pub struct InlineText(pub String);

impl TextSource for InlineText {
    fn extract_text(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "query".to_string()
    }
}

/// Previously extracted OCR text stored on disk
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
    max_bytes: usize,
}

impl TextFile {
    /// Text file with the default size limit
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }

    /// Override the size limit
    pub fn with_limit(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Path being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for TextFile {
    fn extract_text(&self) -> Result<String> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if !extension.is_some_and(|e| TEXT_EXTENSIONS.contains(&e.as_str())) {
            return Err(Error::new(
                ErrorCode::UnsupportedSource,
                format!("Unsupported file type: {}", self.path.display()),
            )
            .with_suggestion("Run OCR first and pass the extracted .txt file"));
        }

        if !self.path.exists() {
            return Err(Error::file_not_found(&self.path));
        }

        let size = std::fs::metadata(&self.path)?.len();
        if size > self.max_bytes as u64 {
            return Err(too_large(self.max_bytes));
        }

        let bytes = std::fs::read(&self.path)?;
        decode(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Everything on standard input
#[derive(Debug, Clone)]
pub struct StdinText {
    max_bytes: usize,
}

impl StdinText {
    /// Stdin reader with the given size limit
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Default for StdinText {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_BYTES)
    }
}

impl TextSource for StdinText {
    fn extract_text(&self) -> Result<String> {
        read_limited(std::io::stdin().lock(), self.max_bytes)
    }

    fn describe(&self) -> String {
        "stdin".to_string()
    }
}

/// Read at most `max_bytes` from `reader` as UTF-8
pub fn read_limited(reader: impl Read, max_bytes: usize) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(too_large(max_bytes));
    }
    decode(bytes)
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| Error::invalid_input("Text is not valid UTF-8").with_source(e))
}

fn too_large(max_bytes: usize) -> Error {
    Error::new(
        ErrorCode::TextTooLarge,
        format!("Text exceeds the {} byte limit", max_bytes),
    )
    .with_suggestion("Raise [input] max_text_bytes in the configuration")
}
