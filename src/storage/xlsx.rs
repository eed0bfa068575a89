//! Spreadsheet codec for the vocabulary table.
//!
//! The first worksheet holds a header row followed by one row per entry.

use super::StoreError;
use crate::model::{ColumnLabels, VocabularyEntry};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use time::macros::{datetime, format_description};
use time::{Duration, PrimitiveDateTime};

const SHEET_NAME: &str = "Sheet1";
const COLUMN_WIDTH: f64 = 28.0;

/// Read every entry from the first worksheet of `path`.
pub fn read_entries(path: &Path, labels: &ColumnLabels) -> Result<Vec<VocabularyEntry>, StoreError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Err(StoreError::InvalidFormat(
                "Workbook contains no sheets".to_string(),
            ))
        }
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = locate_columns(header, labels);

    let mut entries = Vec::new();
    for row in rows {
        let cell = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();
        let entry = VocabularyEntry {
            source_word: cell(columns[0]),
            target_word: cell(columns[1]),
            meaning: cell(columns[2]),
        };
        if entry.source_word.is_empty() && entry.target_word.is_empty() && entry.meaning.is_empty()
        {
            continue;
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Rewrite `path` with a header row and all `entries`.
pub fn write_entries(
    path: &Path,
    labels: &ColumnLabels,
    entries: &[VocabularyEntry],
) -> Result<(), StoreError> {
    let mut xlsx = Workbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_fmt = Format::new().set_bold();
    for (col, label) in labels.as_array().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *label, &header_fmt)?;
        worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    for (idx, entry) in entries.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &entry.source_word)?;
        worksheet.write_string(row, 1, &entry.target_word)?;
        worksheet.write_string(row, 2, &entry.meaning)?;
    }

    xlsx.save(path)?;
    Ok(())
}

/// Map each configured label to a column index. Falls back to the first three
/// columns when any label is missing from the header row.
fn locate_columns(header: &[Data], labels: &ColumnLabels) -> [usize; 3] {
    let names: Vec<String> = header
        .iter()
        .map(|c| cell_text(c).to_lowercase())
        .collect();
    let find = |label: &str| {
        let label = label.trim().to_lowercase();
        names.iter().position(|n| *n == label)
    };

    let [s, t, m] = labels.as_array();
    match (find(s), find(t), find(m)) {
        (Some(s), Some(t), Some(m)) => [s, t, m],
        _ => {
            tracing::debug!("header labels not found, reading columns positionally");
            [0, 1, 2]
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) if dt.is_datetime() => format_serial_date(dt.as_f64()),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Render an Excel serial date as `YYYY-MM-DD`, adding `HH:MM:SS` when the
/// serial carries a time of day. Serials below 60 predate Excel's phantom
/// 1900-02-29 and count from 1899-12-31.
fn format_serial_date(serial: f64) -> String {
    let epoch = if serial < 60.0 {
        datetime!(1899-12-31 0:00)
    } else {
        datetime!(1899-12-30 0:00)
    };
    let secs = (serial * 86_400.0).round() as i64;
    let Some(at) = epoch.checked_add(Duration::seconds(secs)) else {
        return format_number(serial);
    };
    format_datetime(at).unwrap_or_else(|_| format_number(serial))
}

fn format_datetime(at: PrimitiveDateTime) -> Result<String, time::error::Format> {
    if at.time() == time::Time::MIDNIGHT {
        at.format(format_description!("[year]-[month]-[day]"))
    } else {
        at.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
    }
}
