//! # caucus-sync
//!
//! Reconciliation and orchestration: merge markdown-sourced decisions with a
//! remote page ([`reconcile`]), and drive the three pipelines over the
//! [`Remote`] API boundary: decision sync ([`sync_page`]), status
//! aggregation ([`report::aggregate_status`]), and label operations
//! ([`labels`]).

pub mod error;
pub mod labels;
pub mod pipeline;
pub mod reconcile;
pub mod remote;
pub mod report;

pub use error::SyncError;
pub use pipeline::{sync_page, SyncOptions, SyncOutcome};
pub use reconcile::reconcile;
pub use remote::{ConfluenceClient, PageLabel, PageSummary, Remote, RemoteError, RemotePage};
