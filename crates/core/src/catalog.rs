//! File-backed drug catalog
//!
//! Stores `name → instructions` records as pretty JSON and hands the
//! matcher immutable snapshots of them.
//!
//! # Example
//!
//! ```rust
//! use medinstruct_core::catalog::CatalogStore;
//! use medinstruct_search::Matcher;
//!
//! let mut store = CatalogStore::in_memory();
//! store.add("Mometasone Cream/Ointment", "Apply a thin film once daily").unwrap();
//!
//! let matcher = Matcher::new(store);
//! let results = matcher.match_text("mometasone ointment", 0.25, 10);
//! assert_eq!(results[0].name, "Mometasone Cream/Ointment");
//! ```

use crate::error::{Error, ErrorCode, Result, ResultExt};
use crate::validation::validate_catalog_entry;
use chrono::{DateTime, Utc};
use medinstruct_search::{CatalogProvider, CatalogSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Minimum normalized similarity for a "did you mean" hint
pub const SUGGESTION_THRESHOLD: f64 = 0.7;

/// A stored catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Stable identifier, never reused
    pub id: u64,
    /// Canonical drug name
    pub name: String,
    /// Usage instructions shown with a match
    pub instructions: String,
    /// When the record was first added
    pub created_at: DateTime<Utc>,
}

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    next_id: u64,
    records: Vec<CatalogRecord>,
}

/// Catalog store with snapshot support
#[derive(Debug)]
pub struct CatalogStore {
    path: Option<PathBuf>,
    records: BTreeMap<u64, CatalogRecord>,
    next_id: u64,
    snapshot: Arc<CatalogSnapshot>,
}

impl CatalogStore {
    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: BTreeMap::new(),
            next_id: 1,
            snapshot: Arc::new(CatalogSnapshot::new()),
        }
    }

    /// Open the catalog at `path`; a missing file is an empty catalog
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut store = Self::in_memory();
        store.path = Some(path.to_path_buf());

        if !path.exists() {
            debug!(path = %path.display(), "catalog file missing, starting empty");
            return Ok(store);
        }

        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("Failed to read catalog {}", path.display()))?;
        let file: CatalogFile = serde_json::from_str(&content)
            .map_err(Error::from)
            .context(format!("Failed to parse catalog {}", path.display()))?;

        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        for record in &file.records {
            let duplicate = if !seen_ids.insert(record.id) {
                format!("Duplicate catalog id {}", record.id)
            } else if !seen_names.insert(record.name.as_str()) {
                format!("Duplicate catalog name '{}'", record.name)
            } else {
                continue;
            };
            return Err(Error::new(ErrorCode::CatalogParseError, duplicate)
                .with_context(format!("In {}", path.display())));
        }

        let max_id = file.records.iter().map(|r| r.id).max().unwrap_or(0);
        store.next_id = file.next_id.max(max_id + 1);
        store.records = file.records.into_iter().map(|r| (r.id, r)).collect();
        store.rebuild_snapshot();

        debug!(path = %path.display(), records = store.len(), "catalog opened");
        Ok(store)
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the catalog has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by name
    pub fn list(&self) -> Vec<&CatalogRecord> {
        let mut records: Vec<&CatalogRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Record with the given id
    pub fn get(&self, id: u64) -> Option<&CatalogRecord> {
        self.records.get(&id)
    }

    /// Record with exactly this name
    pub fn find(&self, name: &str) -> Option<&CatalogRecord> {
        self.records.values().find(|r| r.name == name)
    }

    /// Add a record
    pub fn add(&mut self, name: &str, instructions: &str) -> Result<CatalogRecord> {
        validate_catalog_entry(name, instructions).to_result()?;
        let name = name.trim();
        if self.find(name).is_some() {
            return Err(Error::duplicate_entry(name));
        }

        let record = CatalogRecord {
            id: self.next_id,
            name: name.to_string(),
            instructions: instructions.trim().to_string(),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.records.insert(record.id, record.clone());
        self.rebuild_snapshot();

        info!(id = record.id, name = %record.name, "catalog entry added");
        Ok(record)
    }

    /// Replace the name and instructions of a record
    pub fn update(&mut self, id: u64, name: &str, instructions: &str) -> Result<CatalogRecord> {
        if !self.records.contains_key(&id) {
            return Err(Error::entry_not_found(id));
        }
        validate_catalog_entry(name, instructions).to_result()?;
        let name = name.trim();
        if self.find(name).is_some_and(|other| other.id != id) {
            return Err(Error::duplicate_entry(name));
        }

        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| Error::entry_not_found(id))?;
        record.name = name.to_string();
        record.instructions = instructions.trim().to_string();
        let updated = record.clone();
        self.rebuild_snapshot();

        info!(id, name = %updated.name, "catalog entry updated");
        Ok(updated)
    }

    /// Remove a record
    pub fn remove(&mut self, id: u64) -> Result<CatalogRecord> {
        let record = self
            .records
            .remove(&id)
            .ok_or_else(|| Error::entry_not_found(id))?;
        self.rebuild_snapshot();

        info!(id, name = %record.name, "catalog entry removed");
        Ok(record)
    }

    /// Write the catalog to its backing file; no-op for in-memory stores
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = CatalogFile {
            next_id: self.next_id,
            records: self.records.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)
            .map_err(Error::from)
            .context(format!("Failed to write catalog {}", path.display()))?;

        debug!(path = %path.display(), records = self.len(), "catalog saved");
        Ok(())
    }

    /// All entries as `name → instructions`
    pub fn export_map(&self) -> BTreeMap<String, String> {
        self.records
            .values()
            .map(|r| (r.name.clone(), r.instructions.clone()))
            .collect()
    }

    /// Closest stored name, when it is similar enough to be a likely typo
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        let mut best: Option<(&str, f64)> = None;

        for record in self.list() {
            let similarity = strsim::normalized_levenshtein(&wanted, &record.name.to_lowercase());
            if similarity > SUGGESTION_THRESHOLD && best.is_none_or(|(_, s)| similarity > s) {
                best = Some((record.name.as_str(), similarity));
            }
        }

        best.map(|(name, _)| name)
    }

    fn rebuild_snapshot(&mut self) {
        self.snapshot = Arc::new(
            self.records
                .values()
                .map(|r| (r.name.clone(), r.instructions.clone()))
                .collect(),
        );
    }
}

impl CatalogProvider for CatalogStore {
    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> CatalogStore {
        let mut store = CatalogStore::in_memory();
        store.add("Tacrolimus Ointment", "Apply twice daily").unwrap();
        store
            .add("Betamethasone Cream/Ointment", "Apply once or twice daily")
            .unwrap();
        store
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(dir.path().join("catalog.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_add_trims_and_assigns_ids() {
        let mut store = CatalogStore::in_memory();
        let first = store.add("  Zinc Oxide Cream ", " Apply as needed ").unwrap();
        let second = store.add("Clotrimazole Cream", "Apply twice daily").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.name, "Zinc Oxide Cream");
        assert_eq!(first.instructions, "Apply as needed");
    }

    #[test]
    fn test_list_orders_by_name() {
        let store = sample_store();
        let names: Vec<&str> = store.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Betamethasone Cream/Ointment", "Tacrolimus Ointment"]);
    }

    #[test]
    fn test_add_duplicate() {
        let mut store = sample_store();
        let err = store.add("Tacrolimus Ointment", "again").unwrap_err();
        assert_eq!(err.code, ErrorCode::CatalogDuplicate);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut store = CatalogStore::in_memory();
        let err = store.add("", "Apply").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = store.add("Mometasone\nCream", "Apply").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update() {
        let mut store = sample_store();
        let id = store.find("Tacrolimus Ointment").unwrap().id;
        let created = store.get(id).unwrap().created_at;

        let updated = store.update(id, "Tacrolimus Ointment 0.1%", "Thin layer").unwrap();
        assert_eq!(updated.created_at, created);
        assert!(store.find("Tacrolimus Ointment").is_none());
        assert_eq!(store.snapshot().get("Tacrolimus Ointment 0.1%"), Some("Thin layer"));
    }

    #[test]
    fn test_update_missing_and_rename_collision() {
        let mut store = sample_store();
        assert_eq!(
            store.update(99, "X", "Y").unwrap_err().code,
            ErrorCode::CatalogEntryNotFound
        );

        let id = store.find("Tacrolimus Ointment").unwrap().id;
        assert_eq!(
            store
                .update(id, "Betamethasone Cream/Ointment", "Y")
                .unwrap_err()
                .code,
            ErrorCode::CatalogDuplicate
        );
        // keeping its own name is fine
        assert!(store.update(id, "Tacrolimus Ointment", "New text").is_ok());
    }

    #[test]
    fn test_remove_never_reuses_ids() {
        let mut store = sample_store();
        let removed = store.remove(2).unwrap();
        assert_eq!(removed.name, "Betamethasone Cream/Ointment");
        assert_eq!(store.remove(2).unwrap_err().code, ErrorCode::CatalogEntryNotFound);

        let next = store.add("Hydrocortisone Cream", "Apply").unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut store = sample_store();
        let before = store.snapshot();
        store.add("Hydrocortisone Cream", "Apply").unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(store.snapshot().len(), 3);
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("catalog.json");

        let mut store = CatalogStore::open(&path).unwrap();
        store.add("Mometasone Cream", "Apply once daily").unwrap();
        store.add("Clotrimazole Cream", "Apply twice daily").unwrap();
        store.remove(2).unwrap();
        store.save().unwrap();

        let reopened = CatalogStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.find("Mometasone Cream").unwrap().id, 1);
        assert_eq!(reopened.snapshot().get("Mometasone Cream"), Some("Apply once daily"));

        let mut reopened = reopened;
        assert_eq!(reopened.add("Zinc Oxide Cream", "Apply").unwrap().id, 3);
    }

    #[test]
    fn test_open_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CatalogStore::open(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::CatalogParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_open_rejects_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let json = r#"{"next_id": 3, "records": [
            {"id": 1, "name": "A", "instructions": "x", "created_at": "2024-01-01T00:00:00Z"},
            {"id": 2, "name": "A", "instructions": "y", "created_at": "2024-01-01T00:00:00Z"}
        ]}"#;
        std::fs::write(&path, json).unwrap();

        assert_eq!(
            CatalogStore::open(&path).unwrap_err().code,
            ErrorCode::CatalogParseError
        );
    }

    #[test]
    fn test_open_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let json = r#"{"next_id": 2, "records": [
            {"id": 1, "name": "A", "instructions": "x", "created_at": "2024-01-01T00:00:00Z"},
            {"id": 1, "name": "B", "instructions": "y", "created_at": "2024-01-01T00:00:00Z"}
        ]}"#;
        std::fs::write(&path, json).unwrap();

        let err = CatalogStore::open(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::CatalogParseError);
        assert!(err.message.contains("Duplicate catalog id 1"));
        // The file is left as it was
        assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
    }

    #[test]
    fn test_export_map() {
        let map = sample_store().export_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Tacrolimus Ointment"], "Apply twice daily");
    }

    #[test]
    fn test_suggest() {
        let store = sample_store();
        assert_eq!(store.suggest("tacrolimus ointmen"), Some("Tacrolimus Ointment"));
        assert_eq!(store.suggest("aspirin"), None);
    }
}
