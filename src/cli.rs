use crate::model::{AppConfig, ColumnLabels, VocabularyEntry};
use crate::storage::{self, VocabularyStore};
use crate::text_summary::{self, Listing, TextSummary};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "bilingual-vocab",
    version,
    about = "Record and search bilingual vocabulary stored in a spreadsheet"
)]
pub struct Cli {
    /// Spreadsheet holding the vocabulary (created on first run)
    #[arg(long, global = true, default_value = "dictionary.xlsx")]
    pub file: PathBuf,

    /// Header label of the source-language column
    #[arg(long, global = true, default_value = "Portuguese")]
    pub source_label: String,

    /// Header label of the target-language column
    #[arg(long, global = true, default_value = "English")]
    pub target_label: String,

    /// Header label of the meaning column
    #[arg(long, global = true, default_value = "Meaning")]
    pub meaning_label: String,

    /// Title shown at the top of the form
    #[arg(long, default_value = "Vocabulary EN-PT")]
    pub title: String,

    /// Print results as JSON instead of text (list/search only)
    #[arg(long, global = true)]
    pub json: bool,

    /// Export listed or matching entries as JSON (list/search only)
    #[arg(long, global = true)]
    pub export_json: Option<PathBuf>,

    /// Export listed or matching entries as CSV (list/search only)
    #[arg(long, global = true)]
    pub export_csv: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Save a new entry
    Add {
        /// Word in the source language
        #[arg(long)]
        source: String,
        /// Word in the target language
        #[arg(long)]
        target: String,
        /// Meaning of the word
        #[arg(long)]
        meaning: String,
    },
    /// Search all fields for a word or expression (case-insensitive)
    Search { term: String },
    /// Print every saved entry
    List,
}

impl Cli {
    /// True when the run ends up in the terminal form rather than printing.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none() && cfg!(feature = "tui")
    }
}

/// Build an `AppConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> AppConfig {
    AppConfig {
        file: args.file.clone(),
        labels: ColumnLabels {
            source: args.source_label.clone(),
            target: args.target_label.clone(),
            meaning: args.meaning_label.clone(),
        },
        title: args.title.clone(),
        json: args.json,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
    }
}

pub fn run(args: Cli) -> Result<()> {
    if args.is_interactive() {
        reject_output_flags(&args)?;
    }
    let cfg = build_config(&args);
    let store = VocabularyStore::open(&cfg.file, cfg.labels.clone())
        .with_context(|| format!("failed to open {}", cfg.file.display()))?;

    let command = match args.command {
        Some(command) => command,
        None => return run_interactive(&cfg, &store),
    };

    match command {
        Command::Add {
            source,
            target,
            meaning,
        } => run_add(&store, &source, &target, &meaning),
        Command::Search { term } => run_search(&cfg, &store, &term),
        Command::List => run_list(&cfg, &store),
    }
}

/// The form prints nothing to stdout, so output flags have nothing to act on.
fn reject_output_flags(args: &Cli) -> Result<()> {
    let used: Vec<&str> = [
        (args.json, "--json"),
        (args.export_json.is_some(), "--export-json"),
        (args.export_csv.is_some(), "--export-csv"),
    ]
    .into_iter()
    .filter_map(|(set, flag)| set.then_some(flag))
    .collect();
    if !used.is_empty() {
        anyhow::bail!(
            "{} only apply to the list and search commands",
            used.join(", ")
        );
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive(cfg: &AppConfig, store: &VocabularyStore) -> Result<()> {
    crate::tui::run(cfg, store)
}

// Fallback when built without TUI support.
#[cfg(not(feature = "tui"))]
fn run_interactive(cfg: &AppConfig, store: &VocabularyStore) -> Result<()> {
    run_list(cfg, store)
}

fn run_add(store: &VocabularyStore, source: &str, target: &str, meaning: &str) -> Result<()> {
    let entry = VocabularyEntry::new(source, target, meaning)?;
    let count = store
        .append(entry)
        .with_context(|| format!("failed to save to {}", store.path().display()))?;
    emit(&TextSummary {
        lines: vec![format!("Word saved successfully! ({count} entries)")],
    })
}

fn run_search(cfg: &AppConfig, store: &VocabularyStore, term: &str) -> Result<()> {
    let found = store.search(term)?;
    handle_exports(cfg, &found)?;
    let summary = if cfg.json {
        text_summary::build_json_summary(&found)?
    } else {
        text_summary::build_text_summary(&found, Listing::Search(term))
    };
    emit(&summary)
}

fn run_list(cfg: &AppConfig, store: &VocabularyStore) -> Result<()> {
    let entries = store
        .list()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    handle_exports(cfg, &entries)?;
    let summary = if cfg.json {
        text_summary::build_json_summary(&entries)?
    } else {
        text_summary::build_text_summary(&entries, Listing::All)
    };
    emit(&summary)
}

/// Handle export operations (JSON and CSV) for listed entries.
fn handle_exports(cfg: &AppConfig, entries: &[VocabularyEntry]) -> Result<()> {
    if let Some(p) = cfg.export_json.as_deref() {
        storage::export_json(p, entries)?;
        eprintln!("Exported JSON: {}", p.display());
    }
    if let Some(p) = cfg.export_csv.as_deref() {
        storage::export_csv(p, &cfg.labels, entries)?;
        eprintln!("Exported CSV: {}", p.display());
    }
    Ok(())
}

fn emit(summary: &TextSummary) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = std::io::LineWriter::new(stdout.lock());
    for line in &summary.lines {
        writeln!(out, "{line}").context("write to stdout")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}
