//! `caucus sync` — synchronize a markdown decision log with a page.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use caucus_core::config::{self, SyncOverrides};
use caucus_sync::{sync_page, ConfluenceClient, Remote, SyncOptions};

/// Arguments for `caucus sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the markdown decision log (falls back to DECISION_MD_LOCATION).
    pub markdown_file: Option<PathBuf>,

    /// Page to synchronize (falls back to DECISION_PAGE_ID).
    #[arg(long)]
    pub page_id: Option<String>,

    /// Space the page lives in (falls back to DECISION_SPACE).
    #[arg(long)]
    pub space_key: Option<String>,

    /// Remove decisions that exist only on the page. Accepted for
    /// compatibility; removal is not implemented and preservation always
    /// applies.
    #[arg(long)]
    pub no_preserve: bool,

    /// Show what would change without writing. Not supported.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        if self.dry_run {
            bail!("--dry-run is not supported; run without it to perform a live sync");
        }

        let overrides = SyncOverrides {
            page_id: self.page_id.clone(),
            space_key: self.space_key.clone(),
            markdown_path: self.markdown_file.clone(),
        };
        let cfg = config::sync_config(&overrides)?;

        if !cfg.markdown_path.exists() {
            bail!("markdown file not found: {}", cfg.markdown_path.display());
        }

        println!("Connecting to {} ...", cfg.credentials.base_url);
        let client = ConfluenceClient::new(&cfg.credentials);
        client
            .verify_connection()
            .context("failed to connect to Confluence")?;

        println!("Starting synchronization");
        println!("  page:     {}", cfg.page_id);
        println!("  space:    {}", cfg.space_key);
        println!("  markdown: {}", cfg.markdown_path.display());

        let options = SyncOptions {
            preserve_remote_only: !self.no_preserve,
        };
        let outcome = sync_page(&client, &cfg.page_id, &cfg.markdown_path, &options)?;

        for warning in &outcome.warnings {
            println!("{} {warning}", "warning:".yellow().bold());
        }

        println!(
            "✓ '{}' synced ({} decisions, {})",
            outcome.page_title,
            outcome.total,
            outcome.report.summary()
        );
        println!(
            "  url: {}/pages/viewpage.action?pageId={}",
            cfg.credentials.base_url.trim_end_matches('/'),
            cfg.page_id
        );
        if !outcome.report.added.is_empty() {
            println!("  added:     {}", outcome.report.added.join(", "));
        }
        if !outcome.report.updated.is_empty() {
            println!("  updated:   {}", outcome.report.updated.join(", "));
        }
        if !outcome.report.unchanged.is_empty() {
            println!("  unchanged: {} decision(s)", outcome.report.unchanged.len());
        }

        if !outcome.report.errors.is_empty() {
            for error in &outcome.report.errors {
                eprintln!("{} {error}", "error:".red().bold());
            }
            bail!(
                "synchronization completed with {} error(s)",
                outcome.report.errors.len()
            );
        }

        println!("Synchronization completed successfully.");
        Ok(())
    }
}
