//! payloadforge CLI — normalize language-model output for PayloadCMS.
//!
//! Reads upstream items (or raw agent text), extracts the embedded JSON
//! object, and prints the normalized record for the publishing step.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
