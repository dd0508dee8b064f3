//! Markdown decision parser for caucus.
//!
//! `parse_decisions(text)` splits a markdown document into sections at every
//! level-2 heading and turns each section into a [`Decision`]. The parse is
//! best-effort by design: malformed sub-fields degrade to documented defaults
//! and only an empty title drops a section.
//!
//! Section conventions:
//! - `## Title` starts a decision; text before the first heading is ignored.
//! - `[[Name]]` anywhere in the section marks an owner (multiple allowed).
//! - `**Status**: value` declares a status explicitly.
//! - `**Date**: value` declares the created date explicitly.
//! - Everything else becomes the description, owner markup stripped.

use once_cell::sync::Lazy;
use regex::Regex;

use caucus_core::types::{Decision, DecisionStatus, Origin, UNASSIGNED};

static OWNER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("owner regex"));
static STATUS_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Status\*\*:\s*([^\n]+)").expect("status regex"));
static DATE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Date\*\*:\s*([^\n]+)").expect("date regex"));

// Keyword inference, scanned in priority order. Reordering changes how
// ambiguous sections classify, so the order is load-bearing:
// DECIDED keywords first, then OPEN, then DEFERRED, default OPEN.
static DECIDED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Approved|Accepted|Decided)\b").expect("decided regex"));
static OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(In Progress|Ongoing)\b").expect("open regex"));
static DEFERRED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Deferred|Postponed|Planning)\b").expect("deferred regex"));

/// Parse every `## `-headed section of `markdown` into a [`Decision`].
///
/// Sections whose heading is empty after stripping markup are dropped;
/// everything else parses.
pub fn parse_decisions(markdown: &str) -> Vec<Decision> {
    split_sections(markdown)
        .into_iter()
        .filter_map(|section| parse_section(&section))
        .collect()
}

/// One raw section: the heading line plus its body lines.
struct Section {
    heading: String,
    body: Vec<String>,
}

fn split_sections(markdown: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            sections.push(Section {
                heading: heading.to_string(),
                body: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line.to_string());
        }
        // Lines before the first heading fall through and are ignored.
    }
    sections
}

fn parse_section(section: &Section) -> Option<Decision> {
    let title = OWNER_RE.replace_all(&section.heading, "").trim().to_string();
    if title.is_empty() {
        return None;
    }

    // Owners are collected from the whole section, heading included.
    let full_text = format!("{}\n{}", section.heading, section.body.join("\n"));
    let owners: Vec<String> = OWNER_RE
        .captures_iter(&full_text)
        .map(|cap| cap[1].trim().to_string())
        .collect();
    let owner = if owners.is_empty() {
        UNASSIGNED.to_string()
    } else {
        owners.join(", ")
    };

    let status = match STATUS_LINE_RE.captures(&full_text) {
        Some(cap) => DecisionStatus::from_declared(&cap[1]),
        None => infer_status(&full_text),
    };
    let date_created = DATE_LINE_RE
        .captures(&full_text)
        .map(|cap| cap[1].trim().to_string());

    let description = section
        .body
        .iter()
        .filter(|line| !is_metadata_line(line))
        .map(|line| OWNER_RE.replace_all(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let mut decision =
        Decision::new(title, owner, description, Origin::Markdown).with_status(status);
    if let Some(date) = date_created {
        decision = decision.with_date_created(date);
    }
    Some(decision)
}

fn is_metadata_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("**Status**:") || trimmed.starts_with("**Date**:")
}

/// Keyword-scan inference for sections without an explicit status line.
fn infer_status(section: &str) -> DecisionStatus {
    if DECIDED_RE.is_match(section) {
        DecisionStatus::Decided
    } else if OPEN_RE.is_match(section) {
        DecisionStatus::Open
    } else if DEFERRED_RE.is_match(section) {
        DecisionStatus::Deferred
    } else {
        DecisionStatus::Open
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
