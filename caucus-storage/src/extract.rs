//! Decision and status-macro extraction from page storage markup.
//!
//! The extractor is total: malformed markup yields whatever parses and never
//! errors. Missing sub-fields degrade to the documented defaults: owner
//! `Unassigned`, status OPEN, title derived from the macro id, status-macro
//! colour `Grey` and title `Unknown`.

use once_cell::sync::Lazy;
use regex::Regex;

use caucus_core::types::{Decision, DecisionStatus, Origin, UNASSIGNED};

use crate::escape::{storage_inline_to_markdown, unescape_html};

static DECISION_MACRO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<ac:structured-macro([^>]*ac:name="decision"[^>]*)>(.*?)</ac:structured-macro>"#)
        .expect("decision macro regex")
});
static STATUS_MACRO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<ac:structured-macro[^>]+ac:name="status"[^>]*>(.*?)</ac:structured-macro>"#)
        .expect("status macro regex")
});
static MACRO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"ac:macro-id="([^"]*)""#).expect("macro id regex"));
static TITLE_PARAM_RE: Lazy<Regex> = Lazy::new(|| param_regex("title"));
static OWNER_PARAM_RE: Lazy<Regex> = Lazy::new(|| param_regex("owner"));
static STATUS_PARAM_RE: Lazy<Regex> = Lazy::new(|| param_regex("status"));
static COLOUR_PARAM_RE: Lazy<Regex> = Lazy::new(|| param_regex("colour"));
static RICH_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<ac:rich-text-body>(.*?)</ac:rich-text-body>").expect("rich body regex")
});
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p>(.*?)</p>").expect("paragraph regex"));

fn param_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)<ac:parameter[^>]+ac:name="{name}"[^>]*>(.*?)</ac:parameter>"#
    ))
    .unwrap_or_else(|e| panic!("parameter regex for {name}: {e}"))
}

fn param(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .map(|cap| unescape_html(cap[1].trim()))
}

/// Extract every decision macro on the page into a [`Decision`] tagged
/// [`Origin::Remote`].
pub fn extract_decisions(markup: &str) -> Vec<Decision> {
    DECISION_MACRO_RE
        .captures_iter(markup)
        .map(|cap| {
            let attrs = &cap[1];
            let inner = &cap[2];

            let macro_id = MACRO_ID_RE
                .captures(attrs)
                .map(|id| id[1].to_string())
                .unwrap_or_default();
            let title = param(&TITLE_PARAM_RE, inner)
                .unwrap_or_else(|| format!("Decision {macro_id}"));
            let owner = param(&OWNER_PARAM_RE, inner).unwrap_or_else(|| UNASSIGNED.to_string());
            let status = param(&STATUS_PARAM_RE, inner)
                .map(|s| DecisionStatus::from_declared(&s))
                .unwrap_or_default();

            let body = RICH_BODY_RE
                .captures(inner)
                .map(|b| b[1].to_string())
                .unwrap_or_default();
            let mut paragraphs = PARAGRAPH_RE.captures_iter(&body);
            let description = paragraphs
                .next()
                .map(|p| storage_inline_to_markdown(&p[1]))
                .unwrap_or_default();

            let mut decision = Decision::new(title, owner, description, Origin::Remote)
                .with_status(status);
            for meta in paragraphs {
                apply_metadata(&mut decision, &storage_inline_to_markdown(&meta[1]));
            }
            decision
        })
        .collect()
}

/// Read trailing `Created:`/`Updated:` stamps back into the date fields.
///
/// Foreign pages may wrap the stamps in emphasis, which the inline
/// down-conversion turns into `*`/`` ` `` markers; those are dropped before
/// prefix-matching so decorated stamps still parse.
fn apply_metadata(decision: &mut Decision, text: &str) {
    for line in text.lines() {
        let line = line.replace(['*', '`'], "");
        let line = line.trim();
        if let Some(date) = line.strip_prefix("Created:") {
            decision.date_created = Some(date.trim().to_string());
        } else if let Some(date) = line.strip_prefix("Updated:") {
            decision.date_updated = Some(date.trim().to_string());
        }
    }
}

/// Extract `(colour, title)` from every status macro on the page, in
/// document order.
pub fn extract_status_pairs(markup: &str) -> Vec<(String, String)> {
    STATUS_MACRO_RE
        .captures_iter(markup)
        .map(|cap| {
            let inner = &cap[1];
            let colour = param(&COLOUR_PARAM_RE, inner).unwrap_or_else(|| "Grey".to_string());
            let title = param(&TITLE_PARAM_RE, inner).unwrap_or_else(|| "Unknown".to_string());
            (colour, title)
        })
        .collect()
}
