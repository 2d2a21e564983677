//! Catalog snapshots consumed by the matcher.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A known item: canonical name plus opaque payload text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical, possibly slash-compound name (unique key)
    pub name: String,
    /// Associated text, returned untouched
    pub payload: String,
}

impl CatalogEntry {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Immutable catalog ordered by name.
///
/// Ordering by key keeps tie-breaks reproducible regardless of how the
/// entries were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    entries: BTreeMap<String, String>,
}

impl CatalogSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from entries; a later duplicate name replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        entries
            .into_iter()
            .map(|e| (e.name, e.payload))
            .collect()
    }

    /// Parse a snapshot from JSON.
    ///
    /// Accepts either an object mapping names to payloads or an array of
    /// `{"name", "payload"}` entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Map(BTreeMap<String, String>),
            List(Vec<CatalogEntry>),
        }

        let wire: Wire = serde_json::from_str(json).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                SearchError::Json(e)
            } else {
                SearchError::InvalidCatalog(e.to_string())
            }
        })?;

        Ok(match wire {
            Wire::Map(entries) => Self { entries },
            Wire::List(list) => Self::from_entries(list),
        })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Iterate `(name, payload)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned entries in name order.
    pub fn to_entries(&self) -> Vec<CatalogEntry> {
        self.iter().map(|(n, p)| CatalogEntry::new(n, p)).collect()
    }
}

impl FromIterator<(String, String)> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Source of catalog snapshots.
///
/// Each match call takes exactly one snapshot up front and never looks at
/// the provider again, so later mutations can't leak into a running query.
pub trait CatalogProvider: Send + Sync {
    /// Current entries as one frozen snapshot.
    fn snapshot(&self) -> Arc<CatalogSnapshot>;
}

impl CatalogProvider for Arc<CatalogSnapshot> {
    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(self)
    }
}

impl CatalogProvider for CatalogSnapshot {
    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::new(self.clone())
    }
}
