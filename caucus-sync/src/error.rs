//! Error types for caucus-sync.

use std::path::PathBuf;

use thiserror::Error;

use caucus_storage::RenderError;

use crate::remote::RemoteError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the remote content API.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An error from the page renderer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
