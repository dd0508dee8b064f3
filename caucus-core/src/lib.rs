//! Caucus core library — domain types, fingerprinting, configuration.
//!
//! Public API surface:
//! - [`types`] — [`Decision`] and friends
//! - [`fingerprint`] — content-identity digests
//! - [`config`] — flag/environment resolution with exhaustive validation
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod types;

pub use config::{Credentials, SyncConfig, SyncOverrides};
pub use error::ConfigError;
pub use fingerprint::{fingerprint, Fingerprint};
pub use types::{Decision, DecisionStatus, Origin, PageId, SpaceKey, SyncReport, UNASSIGNED};
