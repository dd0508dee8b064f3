//! # caucus-storage
//!
//! The Confluence storage-format dialect: extraction of decision and status
//! macros, escaping and inline-formatting conversion, and rendering of the
//! full decision page plus the status aggregation table.
//!
//! Rendering and extraction are designed as inverses over
//! `(title, owner, description)`: what [`page::PageRenderer`] writes,
//! [`extract::extract_decisions`] reads back with identical fingerprints.

pub mod error;
pub mod escape;
pub mod extract;
pub mod page;
pub mod render;

pub use error::RenderError;
pub use extract::{extract_decisions, extract_status_pairs};
pub use page::PageRenderer;
pub use render::{
    count_status_pairs, splice_status_table, status_color, status_table, StatusColor, StatusCount,
    REPORT_BEGIN_MARKER, REPORT_END_MARKER,
};
