//! Tera-backed page renderer.
//!
//! The page skeleton (header, sync summary, decision blocks) is an embedded
//! template; decision and status macros are built in [`crate::render`]
//! because their escaping rules are order-sensitive and belong in code.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::Tera;

use caucus_core::types::{Decision, SyncReport};

use crate::error::RenderError;
use crate::escape::escape_html;
use crate::render::decision_block;

const PAGE_TEMPLATE_NAME: &str = "storage/page.tera";
const PAGE_TEMPLATE: &str = include_str!("templates/page.tera");

/// Timestamp format for the "Last synchronized" header line.
const SYNCED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serializable rendering payload for the page template.
#[derive(Debug, Clone, Serialize)]
struct PageContext {
    title: String,
    synced_at: String,
    summary: Option<String>,
    blocks: Vec<String>,
}

/// Renders the full decision page. Create once with [`PageRenderer::new`]
/// and reuse.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Construct a renderer with the embedded page template.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
        Ok(PageRenderer { tera })
    }

    /// Render the merged decision set into full page storage markup.
    ///
    /// Decisions are sorted by created date, newest first; entries with
    /// missing or unparseable dates sort last. A supplied report adds the
    /// one-line sync summary to the header.
    pub fn render_page(
        &self,
        page_title: &str,
        decisions: &[Decision],
        report: Option<&SyncReport>,
        synced_at: DateTime<Utc>,
    ) -> Result<String, RenderError> {
        let mut ordered: Vec<&Decision> = decisions.iter().collect();
        ordered.sort_by(|a, b| b.created_date().cmp(&a.created_date()));

        let ctx = PageContext {
            title: escape_html(page_title),
            synced_at: synced_at.format(SYNCED_AT_FORMAT).to_string(),
            summary: report.map(SyncReport::summary),
            blocks: ordered.iter().map(|d| decision_block(d)).collect(),
        };
        Ok(self
            .tera
            .render(PAGE_TEMPLATE_NAME, &tera::Context::from_serialize(&ctx)?)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
