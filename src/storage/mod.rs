//! Spreadsheet-backed vocabulary store.
//!
//! Every operation goes straight to the backing file: nothing is cached, and a
//! save rewrites the whole workbook.

mod error;
pub mod export;
mod xlsx;

pub use error::StoreError;
pub use export::{default_export_path, export_csv, export_json};

use crate::model::{ColumnLabels, VocabularyEntry};
use std::path::{Path, PathBuf};

pub struct VocabularyStore {
    path: PathBuf,
    labels: ColumnLabels,
}

impl VocabularyStore {
    /// Bind the store to `path`, creating a header-only workbook on first run.
    pub fn open(path: impl Into<PathBuf>, labels: ColumnLabels) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            labels,
        };
        store.ensure_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn labels(&self) -> &ColumnLabels {
        &self.labels
    }

    /// All entries in stored order.
    pub fn list(&self) -> Result<Vec<VocabularyEntry>, StoreError> {
        if self.ensure_exists()? {
            return Ok(Vec::new());
        }
        let entries = xlsx::read_entries(&self.path, &self.labels)?;
        tracing::debug!(path = %self.path.display(), count = entries.len(), "loaded entries");
        Ok(entries)
    }

    /// Append `entry` and rewrite the file. Returns the new entry count.
    pub fn append(&self, entry: VocabularyEntry) -> Result<usize, StoreError> {
        let mut entries = self.list()?;
        entries.push(entry);
        xlsx::write_entries(&self.path, &self.labels, &entries)?;
        tracing::info!(path = %self.path.display(), count = entries.len(), "entry saved");
        Ok(entries.len())
    }

    /// Entries containing `term` in any field, ignoring case.
    pub fn search(&self, term: &str) -> Result<Vec<VocabularyEntry>, StoreError> {
        if term.trim().is_empty() {
            return Err(StoreError::EmptySearchTerm);
        }
        let entries = self.list()?;
        let found = filter_entries(&entries, term);
        tracing::debug!(term = term.trim(), matches = found.len(), "search finished");
        Ok(found)
    }

    /// Returns true when the file had to be created.
    fn ensure_exists(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        xlsx::write_entries(&self.path, &self.labels, &[])?;
        tracing::info!(path = %self.path.display(), "created empty vocabulary file");
        Ok(true)
    }
}

/// Linear scan keeping stored order. A blank term matches nothing.
pub fn filter_entries(entries: &[VocabularyEntry], term: &str) -> Vec<VocabularyEntry> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| e.matches(&needle))
        .cloned()
        .collect()
}
