//! `caucus report` — aggregate status macros on a page into a table.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use caucus_core::config;
use caucus_sync::report::aggregate_status;
use caucus_sync::{ConfluenceClient, Remote};

/// Arguments for `caucus report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Page to aggregate (falls back to DECISION_PAGE_ID).
    #[arg(long)]
    pub page_id: Option<String>,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "colour")]
    colour: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "occurrences")]
    occurrences: usize,
}

impl ReportArgs {
    pub fn run(self) -> Result<()> {
        let (credentials, page_id) = config::credentials_and_page(self.page_id.clone())?;

        let client = ConfluenceClient::new(&credentials);
        client
            .verify_connection()
            .context("failed to connect to Confluence")?;

        let outcome = aggregate_status(&client, &page_id)
            .with_context(|| format!("status aggregation failed for page {page_id}"))?;

        if !outcome.updated {
            println!("No status macros found on page {page_id}; nothing to do.");
            return Ok(());
        }

        let rows: Vec<StatusRow> = outcome
            .counts
            .iter()
            .map(|c| StatusRow {
                colour: c.colour.clone(),
                status: c.title.clone(),
                occurrences: c.count,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("✓ status table written to page {page_id}");
        Ok(())
    }
}
