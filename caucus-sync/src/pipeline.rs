//! The decision sync pipeline: markdown in, one page write out.
//!
//! Sequence: read markdown → parse decisions → fetch + extract the remote
//! page → reconcile → render → single full-page overwrite. A remote *read*
//! failure downgrades to an empty existing set and the run continues with
//! markdown only; a remote *write* failure is collected into the report and
//! surfaces as a non-zero exit at the CLI.

use std::path::Path;

use chrono::Utc;

use caucus_core::types::{PageId, SyncReport};
use caucus_storage::{extract_decisions, PageRenderer};

use crate::error::{io_err, SyncError};
use crate::reconcile::reconcile;
use crate::remote::Remote;

/// Fallback display title when the existing page cannot be read.
const DEFAULT_PAGE_TITLE: &str = "Decision Log";

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Keep decisions that exist only on the remote page. `true` is the only
    /// supported semantics; `false` is accepted and warned about but never
    /// acted on, as no deletion path exists.
    pub preserve_remote_only: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            preserve_remote_only: true,
        }
    }
}

/// Outcome of a sync run.
#[derive(Debug)]
pub struct SyncOutcome {
    /// Display title of the synchronized page.
    pub page_title: String,
    /// Decisions on the page after the merge.
    pub total: usize,
    /// Classification report; non-empty `errors` means the run failed.
    pub report: SyncReport,
    /// Informational problems that were recovered from.
    pub warnings: Vec<String>,
}

/// Synchronize the page at `page_id` with the markdown file at `markdown_path`.
///
/// Errors before the first remote call (unreadable markdown) abort the run;
/// everything after is collected into the outcome so the caller sees the
/// full picture in one report.
pub fn sync_page(
    remote: &dyn Remote,
    page_id: &PageId,
    markdown_path: &Path,
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    let markdown_text =
        std::fs::read_to_string(markdown_path).map_err(|e| io_err(markdown_path, e))?;
    let markdown_decisions = caucus_markdown::parse_decisions(&markdown_text);
    tracing::info!(
        "parsed {} decisions from {}",
        markdown_decisions.len(),
        markdown_path.display()
    );

    let mut warnings = Vec::new();
    let (page_title, remote_decisions) = match remote.fetch_page(page_id) {
        Ok(page) => {
            let decisions = extract_decisions(&page.body);
            tracing::info!(
                "found {} existing decisions on page '{}'",
                decisions.len(),
                page.title
            );
            (page.title, decisions)
        }
        Err(err) => {
            // Unreadable page means "no existing decisions", not a fatal
            // error; the merge proceeds with markdown-only data.
            tracing::info!("could not read existing decisions ({err}); treating page as empty");
            warnings.push(format!("failed to read existing decisions: {err}"));
            (DEFAULT_PAGE_TITLE.to_string(), Vec::new())
        }
    };

    if !options.preserve_remote_only {
        tracing::warn!(
            "removal of remote-only decisions is not implemented; preserving them anyway"
        );
        warnings.push("remote-only decisions are always preserved; --no-preserve has no effect".to_string());
    }

    let (merged, mut report) = reconcile(markdown_decisions, remote_decisions);

    let renderer = PageRenderer::new()?;
    let body = renderer.render_page(&page_title, &merged, Some(&report), Utc::now())?;

    match remote.update_page(page_id, &page_title, &body) {
        Ok(()) => tracing::info!("updated page {page_id} with {} decisions", merged.len()),
        Err(err) => report.errors.push(format!("failed to update page: {err}")),
    }

    Ok(SyncOutcome {
        page_title,
        total: merged.len(),
        report,
        warnings,
    })
}
