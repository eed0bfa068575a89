use crate::storage::{self, VocabularyStore};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Export the entries currently shown to a timestamped JSON file in the working directory.
pub fn export_shown_json(state: &UiState) -> Result<PathBuf> {
    let path = storage::default_export_path("json")?;
    storage::export_json(&path, &state.entries)?;
    Ok(path)
}

/// Export the entries currently shown to a timestamped CSV file in the working directory.
pub fn export_shown_csv(state: &UiState, store: &VocabularyStore) -> Result<PathBuf> {
    let path = storage::default_export_path("csv")?;
    storage::export_csv(&path, store.labels(), &state.entries)?;
    Ok(path)
}

/// Run an export and report the outcome in `state.info`.
pub fn export_and_report(state: &mut UiState, kind: &str, res: Result<PathBuf>) {
    match res {
        Ok(p) => state.info = format!("Exported {kind}: {}", p.display()),
        Err(e) => {
            tracing::error!("{kind} export failed: {e:#}");
            state.info = format!("{kind} export failed: {e:#}");
        }
    }
}

/// Initialize the clipboard manager thread if not already initialized.
/// Each clipboard instance is kept alive for a while so clipboard managers on
/// Linux can read the contents before it is dropped.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .context("Failed to initialize clipboard manager")
}

/// Queue `text` for the clipboard without blocking the UI loop.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}

/// Copy the selected entry's list line to the clipboard.
pub fn copy_selected(state: &mut UiState) {
    let Some(line) = state.selected_entry().map(ToString::to_string) else {
        state.info = "Nothing selected to copy".into();
        return;
    };
    match copy_to_clipboard(&line) {
        Ok(()) => {
            let shown: String = line.chars().take(57).collect();
            state.info = if shown.len() < line.len() {
                format!("✓ Copied to clipboard: {shown}...")
            } else {
                format!("✓ Copied to clipboard: {line}")
            };
        }
        Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
    }
}
