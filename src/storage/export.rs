//! JSON and CSV export of entry lists.

use crate::model::{ColumnLabels, VocabularyEntry};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

/// Write `entries` as a pretty-printed JSON array.
pub fn export_json(path: &Path, entries: &[VocabularyEntry]) -> Result<()> {
    let data = serde_json::to_vec_pretty(entries).context("serialize entries")?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), count = entries.len(), "exported JSON");
    Ok(())
}

/// Write `entries` as CSV with `labels` as the header row.
pub fn export_csv(path: &Path, labels: &ColumnLabels, entries: &[VocabularyEntry]) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = std::io::BufWriter::new(file);

    write_csv_row(&mut out, &labels.as_array())?;
    for e in entries {
        write_csv_row(
            &mut out,
            &[
                e.source_word.as_str(),
                e.target_word.as_str(),
                e.meaning.as_str(),
            ],
        )?;
    }
    out.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    tracing::info!(path = %path.display(), count = entries.len(), "exported CSV");
    Ok(())
}

/// Timestamped export path in the current directory, e.g.
/// `vocabulary-2024-01-15_14-30-45.json`.
pub fn default_export_path(ext: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    Ok(current_dir.join(default_export_name(OffsetDateTime::now_utc(), ext)?))
}

fn default_export_name(at: OffsetDateTime, ext: &str) -> Result<String> {
    let stamp = at
        .format(format_description!(
            "[year]-[month]-[day]_[hour]-[minute]-[second]"
        ))
        .context("format export timestamp")?;
    Ok(format!("vocabulary-{stamp}.{ext}"))
}

fn write_csv_row<W: Write>(out: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{line}").context("write CSV row")?;
    Ok(())
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use time::macros::datetime;

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"oi\""), "\"say \"\"oi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let entries = vec![
            VocabularyEntry::new("casa", "house", "a building, usually").unwrap(),
            VocabularyEntry::new("gato", "cat", "small feline").unwrap(),
        ];

        export_csv(&path, &ColumnLabels::default(), &entries).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Portuguese,English,Meaning\n\
             casa,house,\"a building, usually\"\n\
             gato,cat,small feline\n"
        );
    }

    #[test]
    fn json_export_is_an_array_of_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let entries = vec![VocabularyEntry::new("gato", "cat", "small feline").unwrap()];

        export_json(&path, &entries).unwrap();
        let parsed: Vec<VocabularyEntry> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn export_name_is_timestamped() {
        let at = datetime!(2024-01-15 14:30:45 UTC);
        assert_eq!(
            default_export_name(at, "csv").unwrap(),
            "vocabulary-2024-01-15_14-30-45.csv"
        );
    }
}
