//! Tracing subscriber setup.
//!
//! Non-interactive runs log to stderr. The terminal form owns the screen, so
//! it logs to a file under the user's local data directory instead.

use crate::cli::Cli;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "bilingual-vocab";
const LOG_FILE: &str = "vocab.log";

pub fn init(args: &Cli) -> Result<()> {
    let filter = build_filter(args.verbose);

    if !args.is_interactive() {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"));
    }

    let Some(path) = log_file_path() else {
        // No data directory on this platform: run without logging.
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

/// `--verbose` wins over `RUST_LOG`; otherwise fall back to warnings only.
fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("bilingual_vocab=debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join(LOG_FILE))
}
