//! Caucus — markdown-to-Confluence decision log synchronizer.
//!
//! # Usage
//!
//! ```text
//! caucus sync [MARKDOWN_FILE] [--page-id <id>] [--space-key <key>] [--no-preserve] [--dry-run]
//! caucus report [--page-id <id>]
//! caucus label cascade <LABEL> [--page-id <id> | --title <title>]
//! caucus label list [--space-key <key>]
//! ```
//!
//! Connection settings come from `CONFLUENCE_URL`, `CONFLUENCE_USERNAME` and
//! `CONFLUENCE_API_TOKEN`; targets default to `DECISION_PAGE_ID`,
//! `DECISION_SPACE` and `DECISION_MD_LOCATION`. A `.env` file in the working
//! directory is loaded first.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{label::LabelCommand, report::ReportArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "caucus",
    version,
    about = "Synchronize markdown decision logs with a Confluence page",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize a markdown decision log with the configured page.
    Sync(SyncArgs),

    /// Aggregate status macros on a page into an occurrence table.
    Report(ReportArgs),

    /// Manage labels across a page tree or space.
    Label {
        #[command(subcommand)]
        command: LabelCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Report(args) => args.run(),
        Commands::Label { command } => commands::label::run(command),
    }
}
