//! Error types for caucus-storage.

use thiserror::Error;

/// All errors that can arise from page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An error from the template engine.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}
