//! Domain types for the Caucus decision log.
//!
//! A [`Decision`] is one logged unit of project decision-making. Decisions are
//! constructed fresh on every run from whichever source produced them; the
//! remote page is the only durable state.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::{fingerprint, Fingerprint};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed Confluence page identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed Confluence space key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceKey(pub String);

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SpaceKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SpaceKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which source a decision was parsed from.
///
/// Markdown is authoritative for content on any mismatch; remote is
/// authoritative for anything markdown never mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Markdown,
    Remote,
}

/// Status of a decision.
///
/// The three canonical states render as `OPEN`, `DECIDED`, `DEFERRED`;
/// anything declared that maps to none of them is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecisionStatus {
    #[default]
    Open,
    Decided,
    Deferred,
    Custom(String),
}

impl DecisionStatus {
    /// Normalise a declared status value.
    ///
    /// Canonical names and their common synonyms collapse onto the three
    /// enum states; any other non-empty value is kept as free text.
    pub fn from_declared(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "OPEN" | "IN PROGRESS" | "ONGOING" => DecisionStatus::Open,
            "DECIDED" | "APPROVED" | "ACCEPTED" => DecisionStatus::Decided,
            "DEFERRED" | "POSTPONED" | "PLANNING" => DecisionStatus::Deferred,
            "" => DecisionStatus::Open,
            _ => DecisionStatus::Custom(trimmed.to_owned()),
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStatus::Open => write!(f, "OPEN"),
            DecisionStatus::Decided => write!(f, "DECIDED"),
            DecisionStatus::Deferred => write!(f, "DEFERRED"),
            DecisionStatus::Custom(text) => write!(f, "{text}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Sentinel owner used when a decision names nobody.
pub const UNASSIGNED: &str = "Unassigned";

/// Date format used for all created/updated stamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One logged unit of project decision-making.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique key within a decision set.
    pub title: String,
    /// Comma-joined owner names; [`UNASSIGNED`] when absent.
    pub owner: String,
    /// Free-text body with markdown inline formatting preserved.
    pub description: String,
    pub status: DecisionStatus,
    /// Content identity over `(title, owner, description)`; status and dates
    /// are deliberately excluded so metadata-only edits are not "changes".
    pub fingerprint: Fingerprint,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub origin: Origin,
}

impl Decision {
    /// Construct a decision, computing its fingerprint and defaulting
    /// `date_created` to today.
    pub fn new(
        title: impl Into<String>,
        owner: impl Into<String>,
        description: impl Into<String>,
        origin: Origin,
    ) -> Self {
        let title = title.into();
        let owner = owner.into();
        let description = description.into();
        let fingerprint = fingerprint(&title, &owner, &description);
        Decision {
            title,
            owner,
            description,
            status: DecisionStatus::default(),
            fingerprint,
            date_created: Some(Utc::now().format(DATE_FORMAT).to_string()),
            date_updated: None,
            origin,
        }
    }

    pub fn with_status(mut self, status: DecisionStatus) -> Self {
        self.status = status;
        self
    }

    /// Override the construction-default created date with an explicit stamp.
    pub fn with_date_created(mut self, date: impl Into<String>) -> Self {
        self.date_created = Some(date.into());
        self
    }

    /// The created date parsed for sorting. Missing or unparseable dates
    /// collapse onto an epoch-like sentinel so they sort as oldest.
    pub fn created_date(&self) -> NaiveDate {
        self.date_created
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok())
            .unwrap_or_else(sentinel_date)
    }
}

fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// Classification report for one reconciliation run.
///
/// Remote-only preserved decisions appear in no bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub errors: Vec<String>,
}

impl SyncReport {
    /// One-line human summary used in the page header and CLI output.
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} updated, {} unchanged",
            self.added.len(),
            self.updated.len(),
            self.unchanged.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
