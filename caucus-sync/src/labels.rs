//! Label operations: cascade a label down a page tree, list a space's
//! labels by occurrence.

use caucus_core::types::{PageId, SpaceKey};

use crate::error::SyncError;
use crate::remote::Remote;

/// Outcome of a label cascade. Per-page failures are collected, not fatal.
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    /// Titles of every page the label was added to, in visit order.
    pub labeled: Vec<String>,
    pub errors: Vec<String>,
}

/// Occurrence count for one label across a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Add `label` to the page at `root` and, depth-first, to every descendant.
///
/// An unreadable root is fatal (the target is wrong); any failure below it
/// is collected and the walk continues.
pub fn cascade(
    remote: &dyn Remote,
    root: &PageId,
    label: &str,
) -> Result<CascadeOutcome, SyncError> {
    let root_title = remote.fetch_page(root)?.title;
    let mut outcome = CascadeOutcome::default();
    apply_label(remote, root, &root_title, label, &mut outcome);
    Ok(outcome)
}

fn apply_label(
    remote: &dyn Remote,
    id: &PageId,
    title: &str,
    label: &str,
    outcome: &mut CascadeOutcome,
) {
    match remote.add_label(id, label) {
        Ok(()) => {
            tracing::info!("label '{label}' added to page '{title}' (id {id})");
            outcome.labeled.push(title.to_string());
        }
        Err(err) => outcome
            .errors
            .push(format!("failed to label '{title}': {err}")),
    }

    match remote.child_pages(id) {
        Ok(children) => {
            for child in children {
                apply_label(remote, &child.id, &child.title, label, outcome);
            }
        }
        Err(err) => outcome
            .errors
            .push(format!("failed to list children of '{title}': {err}")),
    }
}

/// Find a page in `space` by exact display title.
pub fn find_page_by_title(
    remote: &dyn Remote,
    space: &SpaceKey,
    title: &str,
) -> Result<Option<PageId>, SyncError> {
    let pages = remote.list_space_pages(space)?;
    Ok(pages.into_iter().find(|p| p.title == title).map(|p| p.id))
}

/// Every label in `space`, counted by occurrence and sorted descending.
/// Ties keep first-seen order.
pub fn list_sorted(remote: &dyn Remote, space: &SpaceKey) -> Result<Vec<LabelCount>, SyncError> {
    let labels = remote.space_labels(space)?;
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in labels {
        match counts
            .iter_mut()
            .find(|c| c.id == label.id && c.name == label.name)
        {
            Some(existing) => existing.count += 1,
            None => counts.push(LabelCount {
                id: label.id,
                name: label.name,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}
