mod cli;
mod logging;
mod model;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(&args)?;
    cli::run(args)
}
