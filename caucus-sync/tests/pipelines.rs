//! End-to-end pipeline tests over an in-memory [`Remote`] fake.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use caucus_core::types::{Decision, DecisionStatus, Origin, PageId, SpaceKey};
use caucus_storage::render::decision_block;
use caucus_storage::{extract_decisions, REPORT_BEGIN_MARKER};
use caucus_sync::labels;
use caucus_sync::pipeline::{sync_page, SyncOptions};
use caucus_sync::remote::{PageLabel, PageSummary, Remote, RemoteError, RemotePage};
use caucus_sync::report::aggregate_status;

// ---------------------------------------------------------------------------
// Fake remote
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeRemote {
    pages: RefCell<HashMap<String, RemotePage>>,
    children: HashMap<String, Vec<PageSummary>>,
    space_labels: Vec<PageLabel>,
    labels_added: RefCell<Vec<(String, String)>>,
    fail_fetch: bool,
    fail_update: bool,
    fail_label_for: HashSet<String>,
}

impl FakeRemote {
    fn with_page(id: &str, title: &str, body: &str) -> Self {
        let fake = FakeRemote::default();
        fake.pages.borrow_mut().insert(
            id.to_string(),
            RemotePage {
                id: PageId::from(id),
                title: title.to_string(),
                version: 1,
                body: body.to_string(),
            },
        );
        fake
    }

    fn page_body(&self, id: &str) -> String {
        self.pages
            .borrow()
            .get(id)
            .map(|p| p.body.clone())
            .expect("page exists")
    }
}

fn status_err() -> RemoteError {
    RemoteError::Status {
        status: 500,
        url: "fake://remote".to_string(),
    }
}

impl Remote for FakeRemote {
    fn verify_connection(&self) -> Result<(), RemoteError> {
        Ok(())
    }

    fn fetch_page(&self, id: &PageId) -> Result<RemotePage, RemoteError> {
        if self.fail_fetch {
            return Err(status_err());
        }
        self.pages
            .borrow()
            .get(&id.0)
            .cloned()
            .ok_or(RemoteError::Status {
                status: 404,
                url: format!("fake://remote/{id}"),
            })
    }

    fn update_page(&self, id: &PageId, title: &str, body: &str) -> Result<(), RemoteError> {
        if self.fail_update {
            return Err(status_err());
        }
        let mut pages = self.pages.borrow_mut();
        let entry = pages.entry(id.0.clone()).or_insert_with(|| RemotePage {
            id: id.clone(),
            title: title.to_string(),
            version: 0,
            body: String::new(),
        });
        entry.title = title.to_string();
        entry.version += 1;
        entry.body = body.to_string();
        Ok(())
    }

    fn list_space_pages(&self, _space: &SpaceKey) -> Result<Vec<PageSummary>, RemoteError> {
        Ok(self
            .pages
            .borrow()
            .values()
            .map(|p| PageSummary {
                id: p.id.clone(),
                title: p.title.clone(),
            })
            .collect())
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, RemoteError> {
        Ok(self.children.get(&id.0).cloned().unwrap_or_default())
    }

    fn add_label(&self, id: &PageId, label: &str) -> Result<(), RemoteError> {
        if self.fail_label_for.contains(&id.0) {
            return Err(status_err());
        }
        self.labels_added
            .borrow_mut()
            .push((id.0.clone(), label.to_string()));
        Ok(())
    }

    fn space_labels(&self, _space: &SpaceKey) -> Result<Vec<PageLabel>, RemoteError> {
        Ok(self.space_labels.clone())
    }
}

fn write_markdown(dir: &TempDir, content: &str) -> PathBuf {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = dir.path().join("decisions.md");
    fs::write(&path, content).expect("write markdown");
    path
}

// ---------------------------------------------------------------------------
// Decision sync
// ---------------------------------------------------------------------------

#[test]
fn first_sync_adds_every_markdown_decision() {
    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(
        &dir,
        "## Ship v2 [[Alice]]\n**Status**: Approved\nShip it.\n\n## Pick a queue [[Ben]]\nKafka.",
    );
    let remote = FakeRemote::with_page("42", "Team Decisions", "<p>empty</p>");

    let outcome = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("sync");

    assert_eq!(outcome.report.added, vec!["Ship v2", "Pick a queue"]);
    assert!(outcome.report.errors.is_empty());
    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.page_title, "Team Decisions");

    let body = remote.page_body("42");
    assert!(body.contains("<h1>Team Decisions</h1>"));
    assert!(body.contains("Sync Summary:</strong> 2 added, 0 updated, 0 unchanged"));
    let extracted = extract_decisions(&body);
    assert_eq!(extracted.len(), 2);
}

#[test]
fn remote_only_decisions_are_preserved_and_unclassified() {
    let legacy = Decision::new("Legacy Note", "Ops", "Keep the lights on.", Origin::Remote)
        .with_date_created("2022-02-02");
    let remote = FakeRemote::with_page("42", "Log", &decision_block(&legacy));

    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(&dir, "## Retired Feature\nSunset the old exporter.");

    let outcome = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("sync");

    assert_eq!(outcome.report.added, vec!["Retired Feature"]);
    assert_eq!(outcome.total, 2);
    for bucket in [
        &outcome.report.added,
        &outcome.report.updated,
        &outcome.report.unchanged,
    ] {
        assert!(!bucket.iter().any(|t| t == "Legacy Note"));
    }

    let titles: Vec<String> = extract_decisions(&remote.page_body("42"))
        .into_iter()
        .map(|d| d.title)
        .collect();
    assert!(titles.contains(&"Retired Feature".to_string()));
    assert!(titles.contains(&"Legacy Note".to_string()));
}

#[test]
fn second_run_with_unchanged_markdown_classifies_everything_unchanged() {
    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(
        &dir,
        "## Ship v2 [[Alice]]\n**Date**: 2024-01-15\nShip it.\n\n## Pick a queue\nKafka.",
    );
    let remote = FakeRemote::with_page("42", "Log", "");

    let first = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("first sync");
    assert_eq!(first.report.added.len(), 2);
    let after_first = extract_decisions(&remote.page_body("42"));

    let second = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("second sync");
    assert!(second.report.added.is_empty());
    assert!(second.report.updated.is_empty());
    assert_eq!(second.report.unchanged.len(), 2);

    let after_second = extract_decisions(&remote.page_body("42"));
    let fp = |ds: &[Decision]| -> Vec<String> {
        let mut v: Vec<String> = ds.iter().map(|d| d.fingerprint.0.clone()).collect();
        v.sort();
        v
    };
    assert_eq!(fp(&after_first), fp(&after_second));
}

#[test]
fn changed_description_classifies_updated_and_markdown_wins() {
    let existing = Decision::new("Ship v2", "Alice", "Ship it.", Origin::Remote)
        .with_status(DecisionStatus::Decided);
    let remote = FakeRemote::with_page("42", "Log", &decision_block(&existing));

    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(&dir, "## Ship v2 [[Alice]]\nActually, hold the release.");

    let outcome = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("sync");
    assert_eq!(outcome.report.updated, vec!["Ship v2"]);

    let merged = extract_decisions(&remote.page_body("42"));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].description, "Actually, hold the release.");
    assert!(merged[0].date_updated.is_some(), "updated-date stamped");
}

#[test]
fn fetch_failure_degrades_to_markdown_only_and_still_writes() {
    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(&dir, "## Solo Decision\nBody.");
    let remote = FakeRemote {
        fail_fetch: true,
        ..FakeRemote::default()
    };

    let outcome = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("sync proceeds");

    assert!(!outcome.warnings.is_empty(), "read failure reported as warning");
    assert!(outcome.report.errors.is_empty(), "read failure is not fatal");
    assert_eq!(outcome.report.added, vec!["Solo Decision"]);
    assert_eq!(outcome.page_title, "Decision Log");
    assert!(remote.page_body("42").contains("Solo Decision"));
}

#[test]
fn update_failure_is_collected_not_raised() {
    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(&dir, "## Doomed\nBody.");
    let mut remote = FakeRemote::with_page("42", "Log", "");
    remote.fail_update = true;

    let outcome = sync_page(&remote, &PageId::from("42"), &md, &SyncOptions::default())
        .expect("outcome still returned");
    assert_eq!(outcome.report.errors.len(), 1);
    assert!(outcome.report.errors[0].contains("failed to update page"));
}

#[test]
fn missing_markdown_file_is_a_hard_error() {
    let remote = FakeRemote::with_page("42", "Log", "");
    let err = sync_page(
        &remote,
        &PageId::from("42"),
        std::path::Path::new("/nonexistent/decisions.md"),
        &SyncOptions::default(),
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("/nonexistent/decisions.md"));
}

#[test]
fn no_preserve_option_warns_and_changes_nothing() {
    let legacy = Decision::new("Legacy Note", "Ops", "Still here.", Origin::Remote);
    let remote = FakeRemote::with_page("42", "Log", &decision_block(&legacy));

    let dir = TempDir::new().expect("tempdir");
    let md = write_markdown(&dir, "## Fresh\nBody.");

    let options = SyncOptions {
        preserve_remote_only: false,
    };
    let outcome =
        sync_page(&remote, &PageId::from("42"), &md, &options).expect("sync");

    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.contains("--no-preserve has no effect")));
    let titles: Vec<String> = extract_decisions(&remote.page_body("42"))
        .into_iter()
        .map(|d| d.title)
        .collect();
    assert!(titles.contains(&"Legacy Note".to_string()), "still preserved");
}

// ---------------------------------------------------------------------------
// Status aggregation
// ---------------------------------------------------------------------------

#[test]
fn status_aggregation_splices_a_table() {
    let body = r#"<p>intro</p>
<ac:structured-macro ac:name="status"><ac:parameter ac:name="colour">Green</ac:parameter><ac:parameter ac:name="title">Done</ac:parameter></ac:structured-macro>
<ac:structured-macro ac:name="status"><ac:parameter ac:name="colour">Green</ac:parameter><ac:parameter ac:name="title">Done</ac:parameter></ac:structured-macro>
<ac:structured-macro ac:name="status"><ac:parameter ac:name="colour">Blue</ac:parameter><ac:parameter ac:name="title">Open</ac:parameter></ac:structured-macro>"#;
    let remote = FakeRemote::with_page("7", "Board", body);

    let outcome = aggregate_status(&remote, &PageId::from("7")).expect("aggregate");
    assert!(outcome.updated);
    assert_eq!(outcome.counts.len(), 2);
    assert_eq!(outcome.counts[0].count, 2);

    let new_body = remote.page_body("7");
    assert!(new_body.contains(REPORT_BEGIN_MARKER));
    assert!(new_body.contains("Total by Color"));
}

#[test]
fn page_without_status_macros_is_left_untouched() {
    let remote = FakeRemote::with_page("7", "Board", "<p>plain</p>");
    let outcome = aggregate_status(&remote, &PageId::from("7")).expect("aggregate");
    assert!(!outcome.updated);
    assert!(outcome.counts.is_empty());
    assert_eq!(remote.page_body("7"), "<p>plain</p>");
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

fn summary(id: &str, title: &str) -> PageSummary {
    PageSummary {
        id: PageId::from(id),
        title: title.to_string(),
    }
}

#[test]
fn cascade_labels_root_and_descendants_depth_first() {
    let mut remote = FakeRemote::with_page("1", "Root", "");
    remote.children = HashMap::from([
        ("1".to_string(), vec![summary("2", "Child A"), summary("4", "Child B")]),
        ("2".to_string(), vec![summary("3", "Grandchild")]),
    ]);

    let outcome = labels::cascade(&remote, &PageId::from("1"), "archive").expect("cascade");
    assert_eq!(
        outcome.labeled,
        vec!["Root", "Child A", "Grandchild", "Child B"]
    );
    assert!(outcome.errors.is_empty());
    assert_eq!(remote.labels_added.borrow().len(), 4);
}

#[test]
fn cascade_collects_per_page_failures_and_continues() {
    let mut remote = FakeRemote::with_page("1", "Root", "");
    remote.children = HashMap::from([(
        "1".to_string(),
        vec![summary("2", "Fragile"), summary("3", "Sturdy")],
    )]);
    remote.fail_label_for = HashSet::from(["2".to_string()]);

    let outcome = labels::cascade(&remote, &PageId::from("1"), "archive").expect("cascade");
    assert_eq!(outcome.labeled, vec!["Root", "Sturdy"]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Fragile"));
}

#[test]
fn label_listing_counts_and_sorts_descending() {
    let mut remote = FakeRemote::default();
    let label = |id: &str, name: &str| PageLabel {
        id: id.to_string(),
        name: name.to_string(),
    };
    remote.space_labels = vec![
        label("10", "rare"),
        label("11", "common"),
        label("11", "common"),
        label("11", "common"),
        label("12", "middling"),
        label("12", "middling"),
    ];

    let sorted = labels::list_sorted(&remote, &SpaceKey::from("ENG")).expect("list");
    let names: Vec<&str> = sorted.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["common", "middling", "rare"]);
    assert_eq!(sorted[0].count, 3);
}

#[test]
fn find_page_by_title_matches_exactly() {
    let remote = FakeRemote::with_page("9", "Release Notes", "");
    let found = labels::find_page_by_title(&remote, &SpaceKey::from("ENG"), "Release Notes")
        .expect("lookup");
    assert_eq!(found, Some(PageId::from("9")));

    let missing =
        labels::find_page_by_title(&remote, &SpaceKey::from("ENG"), "Absent").expect("lookup");
    assert!(missing.is_none());
}
