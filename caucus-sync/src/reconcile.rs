//! Decision reconciliation: merge markdown-sourced and remote-sourced
//! decision sets by title, classifying each markdown entry by fingerprint.
//!
//! Tie-break rules:
//! - markdown is authoritative for content on any mismatch;
//! - remote is authoritative for anything markdown never mentions;
//! - no deletions are ever inferred.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use caucus_core::types::{Decision, SyncReport, DATE_FORMAT};

/// Merge the two decision sequences.
///
/// Markdown decisions are walked in input order: an identical fingerprint
/// keeps the remote version (classified `unchanged`), a differing one keeps
/// the markdown version stamped with today's updated-date (`updated`), and a
/// title unknown remotely keeps the markdown version as-is (`added`).
/// Remote-only decisions are appended unchanged and classified into no
/// bucket. Duplicate titles within either input collapse last-write-wins
/// before the walk, so merged titles are unique.
pub fn reconcile(markdown: Vec<Decision>, remote: Vec<Decision>) -> (Vec<Decision>, SyncReport) {
    let markdown = dedupe_by_title(markdown);
    let remote = dedupe_by_title(remote);

    let remote_by_title: HashMap<&str, &Decision> =
        remote.iter().map(|d| (d.title.as_str(), d)).collect();

    let mut report = SyncReport::default();
    let mut merged: Vec<Decision> = Vec::with_capacity(markdown.len() + remote.len());

    for md in &markdown {
        match remote_by_title.get(md.title.as_str()) {
            Some(existing) if existing.fingerprint == md.fingerprint => {
                merged.push((*existing).clone());
                report.unchanged.push(md.title.clone());
            }
            Some(_) => {
                let mut winner = md.clone();
                winner.date_updated = Some(Utc::now().format(DATE_FORMAT).to_string());
                merged.push(winner);
                report.updated.push(md.title.clone());
            }
            None => {
                merged.push(md.clone());
                report.added.push(md.title.clone());
            }
        }
    }

    let markdown_titles: HashSet<&str> = markdown.iter().map(|d| d.title.as_str()).collect();
    for rd in remote {
        if !markdown_titles.contains(rd.title.as_str()) {
            merged.push(rd);
        }
    }

    (merged, report)
}

/// Collapse duplicate titles, keeping the last occurrence's value at the
/// first occurrence's position.
fn dedupe_by_title(decisions: Vec<Decision>) -> Vec<Decision> {
    let mut order: Vec<String> = Vec::new();
    let mut by_title: HashMap<String, Decision> = HashMap::new();
    for decision in decisions {
        if !by_title.contains_key(&decision.title) {
            order.push(decision.title.clone());
        }
        by_title.insert(decision.title.clone(), decision);
    }
    order
        .into_iter()
        .filter_map(|title| by_title.remove(&title))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
