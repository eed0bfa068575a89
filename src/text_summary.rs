//! Text and JSON rendering of entry lists for CLI output.

use crate::model::VocabularyEntry;
use anyhow::Result;

/// Pre-formatted lines for stdout.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// What produced the listed entries; only affects the empty-result line.
pub(crate) enum Listing<'a> {
    All,
    Search(&'a str),
}

pub(crate) fn build_text_summary(entries: &[VocabularyEntry], listing: Listing<'_>) -> TextSummary {
    if entries.is_empty() {
        let line = match listing {
            Listing::All => "No entries yet.".to_string(),
            Listing::Search(term) => format!("No matches for '{}'.", term.trim()),
        };
        return TextSummary { lines: vec![line] };
    }

    TextSummary {
        lines: entries.iter().map(ToString::to_string).collect(),
    }
}

pub(crate) fn build_json_summary(entries: &[VocabularyEntry]) -> Result<TextSummary> {
    let out = serde_json::to_string_pretty(entries)?;
    Ok(TextSummary { lines: vec![out] })
}
