//! WASM bindings for the matcher.

use crate::{match_catalog, similarity_ratio, CatalogSnapshot};
use wasm_bindgen::prelude::*;

/// Match text against a JSON catalog and return results as JSON.
///
/// # Arguments
/// * `text` - OCR output or typed query
/// * `catalog_json` - JSON object of name to payload, or array of `{name, payload}`
/// * `cutoff` - Minimum score (0-1)
/// * `max_results` - Maximum results to return
///
/// # Returns
/// JSON array of results; `[]` when the catalog can't be parsed
#[wasm_bindgen(js_name = matchJson)]
pub fn match_json(text: &str, catalog_json: &str, cutoff: f64, max_results: usize) -> String {
    let catalog = match CatalogSnapshot::from_json_str(catalog_json) {
        Ok(catalog) => catalog,
        Err(_) => return "[]".to_string(),
    };

    let results = match_catalog(text, &catalog, cutoff, max_results);
    serde_json::to_string(&results).unwrap_or_else(|_| "[]".to_string())
}

/// Block similarity ratio between two strings.
#[wasm_bindgen]
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_ratio(a, b)
}
