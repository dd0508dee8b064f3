//! Error types for caucus-core.

use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required settings were absent from both flags and the
    /// environment. `vars` is the exhaustive list, in declaration order.
    #[error("missing required configuration: {}", .vars.join(", "))]
    Missing { vars: Vec<String> },
}
