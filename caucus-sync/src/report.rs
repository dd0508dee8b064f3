//! Status-marker aggregation: count the status macros on a page and splice
//! an occurrence table back into the page body.

use caucus_core::types::PageId;
use caucus_storage::{
    count_status_pairs, extract_status_pairs, splice_status_table, status_table, StatusCount,
};

use crate::error::SyncError;
use crate::remote::Remote;

/// Outcome of a status aggregation run.
#[derive(Debug)]
pub struct ReportOutcome {
    /// Occurrence counts in first-seen order; empty when the page carries no
    /// status macros.
    pub counts: Vec<StatusCount>,
    /// Whether the page was rewritten. A page without status macros is left
    /// untouched.
    pub updated: bool,
}

/// Aggregate the status macros on `page_id` into a table between the report
/// markers, appending a fresh marker section when none exists.
pub fn aggregate_status(remote: &dyn Remote, page_id: &PageId) -> Result<ReportOutcome, SyncError> {
    let page = remote.fetch_page(page_id)?;
    let pairs = extract_status_pairs(&page.body);
    if pairs.is_empty() {
        tracing::info!("no status macros found on page {page_id}");
        return Ok(ReportOutcome {
            counts: Vec::new(),
            updated: false,
        });
    }

    let counts = count_status_pairs(&pairs);
    let table = status_table(&counts);
    let body = splice_status_table(&page.body, &table);
    remote.update_page(page_id, &page.title, &body)?;
    tracing::info!(
        "wrote status table with {} distinct statuses to page {page_id}",
        counts.len()
    );

    Ok(ReportOutcome {
        counts,
        updated: true,
    })
}
