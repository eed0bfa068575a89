use crate::storage::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Resolved application settings, built once from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub file: PathBuf,
    pub labels: ColumnLabels,
    pub title: String,
    pub json: bool,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

/// One of the three user-entered columns of a vocabulary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Source,
    Target,
    Meaning,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Source => "source word",
            Field::Target => "target word",
            Field::Meaning => "meaning",
        };
        f.write_str(name)
    }
}

/// Header labels written to (and looked up in) the first row of the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLabels {
    pub source: String,
    pub target: String,
    pub meaning: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            source: "Portuguese".into(),
            target: "English".into(),
            meaning: "Meaning".into(),
        }
    }
}

impl ColumnLabels {
    pub fn as_array(&self) -> [&str; 3] {
        [&self.source, &self.target, &self.meaning]
    }
}

/// A single saved word. Entries carry no identifier; two rows with the same
/// content are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub source_word: String,
    pub target_word: String,
    pub meaning: String,
}

impl VocabularyEntry {
    /// Build a new entry from raw form input. Surrounding whitespace is
    /// trimmed and every field must be non-empty afterwards.
    pub fn new(source: &str, target: &str, meaning: &str) -> Result<Self, StoreError> {
        let source = source.trim();
        let target = target.trim();
        let meaning = meaning.trim();

        for (field, value) in [
            (Field::Source, source),
            (Field::Target, target),
            (Field::Meaning, meaning),
        ] {
            if value.is_empty() {
                return Err(StoreError::EmptyField(field));
            }
        }

        Ok(Self {
            source_word: source.to_string(),
            target_word: target.to_string(),
            meaning: meaning.to_string(),
        })
    }

    /// Case-insensitive substring test. `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.source_word, &self.target_word, &self.meaning]
            .iter()
            .any(|v| v.to_lowercase().contains(needle))
    }
}

impl fmt::Display for VocabularyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.source_word, self.target_word, self.meaning
        )
    }
}
