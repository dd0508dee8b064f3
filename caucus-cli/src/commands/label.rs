//! `caucus label` — cascade labels down a page tree, list space labels.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use caucus_core::config;
use caucus_core::types::PageId;
use caucus_sync::labels;
use caucus_sync::{ConfluenceClient, Remote};

#[derive(Subcommand, Debug)]
pub enum LabelCommand {
    /// Add a label to a page and every descendant page.
    Cascade(CascadeArgs),

    /// List a space's labels sorted by occurrence.
    List(ListArgs),
}

/// Arguments for `caucus label cascade`.
#[derive(Args, Debug)]
pub struct CascadeArgs {
    /// Label to add.
    pub label: String,

    /// Root page of the cascade (falls back to DECISION_PAGE_ID).
    #[arg(long, conflicts_with = "title")]
    pub page_id: Option<String>,

    /// Locate the root page by exact display title instead of id.
    #[arg(long)]
    pub title: Option<String>,

    /// Space to search when using --title (falls back to DECISION_SPACE).
    #[arg(long)]
    pub space_key: Option<String>,
}

/// Arguments for `caucus label list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Space to list (falls back to DECISION_SPACE).
    #[arg(long)]
    pub space_key: Option<String>,
}

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "count")]
    count: usize,
}

pub fn run(command: LabelCommand) -> Result<()> {
    match command {
        LabelCommand::Cascade(args) => args.run(),
        LabelCommand::List(args) => args.run(),
    }
}

impl CascadeArgs {
    pub fn run(self) -> Result<()> {
        // Resolve everything the chosen addressing mode needs in one pass so
        // missing settings surface as a single exhaustive report.
        match self.title.as_deref() {
            Some(title) => {
                let (credentials, space) =
                    config::credentials_and_space(self.space_key.clone())?;
                let client = ConfluenceClient::new(&credentials);
                client
                    .verify_connection()
                    .context("failed to connect to Confluence")?;
                let root = labels::find_page_by_title(&client, &space, title)
                    .with_context(|| format!("failed to search space {space}"))?
                    .with_context(|| format!("no page titled '{title}' in space {space}"))?;
                cascade_from(&client, &root, &self.label)
            }
            None => {
                let (credentials, page_id) =
                    config::credentials_and_page(self.page_id.clone())?;
                let client = ConfluenceClient::new(&credentials);
                client
                    .verify_connection()
                    .context("failed to connect to Confluence")?;
                cascade_from(&client, &page_id, &self.label)
            }
        }
    }
}

fn cascade_from(client: &ConfluenceClient, root: &PageId, label: &str) -> Result<()> {
    let outcome = labels::cascade(client, root, label)
        .with_context(|| format!("label cascade failed from page {root}"))?;

    println!("Pages labeled '{label}':");
    for title in &outcome.labeled {
        println!("  - {title}");
    }
    if !outcome.errors.is_empty() {
        for error in &outcome.errors {
            eprintln!("{} {error}", "error:".red().bold());
        }
        bail!("labeling completed with {} error(s)", outcome.errors.len());
    }
    println!("✓ {} page(s) labeled", outcome.labeled.len());
    Ok(())
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let (credentials, space) = config::credentials_and_space(self.space_key.clone())?;

        let client = ConfluenceClient::new(&credentials);
        client
            .verify_connection()
            .context("failed to connect to Confluence")?;

        let sorted = labels::list_sorted(&client, &space)
            .with_context(|| format!("failed to list labels for space {space}"))?;
        if sorted.is_empty() {
            println!("No labels found in space {space}.");
            return Ok(());
        }

        let rows: Vec<LabelRow> = sorted
            .iter()
            .enumerate()
            .map(|(i, l)| LabelRow {
                rank: i + 1,
                id: l.id.clone(),
                name: l.name.clone(),
                count: l.count,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
