//! Runtime configuration, resolved from CLI flags and the environment.
//!
//! # Resolution order
//!
//! Per field: explicit CLI override first, then the environment variable.
//! Validation is a pure function returning the exhaustive list of missing
//! variables; callers get one complete report, never a one-at-a-time drip.
//!
//! # API pattern
//!
//! Every resolver has two forms:
//! - `fn_with(lookup, …)` — explicit variable lookup; used in tests
//! - `fn(…)` — reads the process environment, delegates to `_with`
//!
//! Tests must NEVER call the env-reading wrappers; always use `_with`.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{PageId, SpaceKey};

/// Environment variable names, shared with the CLI help text.
pub const ENV_URL: &str = "CONFLUENCE_URL";
pub const ENV_USERNAME: &str = "CONFLUENCE_USERNAME";
pub const ENV_API_TOKEN: &str = "CONFLUENCE_API_TOKEN";
pub const ENV_PAGE_ID: &str = "DECISION_PAGE_ID";
pub const ENV_SPACE_KEY: &str = "DECISION_SPACE";
pub const ENV_MARKDOWN_PATH: &str = "DECISION_MD_LOCATION";

/// Connection settings shared by every remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub username: String,
    pub api_token: String,
}

/// Full configuration for a decision sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub credentials: Credentials,
    pub page_id: PageId,
    pub space_key: SpaceKey,
    pub markdown_path: PathBuf,
}

/// CLI-provided overrides for the sync command. `None` falls back to the
/// corresponding environment variable.
#[derive(Debug, Clone, Default)]
pub struct SyncOverrides {
    pub page_id: Option<String>,
    pub space_key: Option<String>,
    pub markdown_path: Option<PathBuf>,
}

/// Resolve connection credentials using `lookup` for variable access.
pub fn credentials_with(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    let base_url = lookup(ENV_URL);
    let username = lookup(ENV_USERNAME);
    let api_token = lookup(ENV_API_TOKEN);

    let missing = missing_fields(&[
        (ENV_URL, base_url.is_some()),
        (ENV_USERNAME, username.is_some()),
        (ENV_API_TOKEN, api_token.is_some()),
    ]);
    if !missing.is_empty() {
        return Err(ConfigError::Missing { vars: missing });
    }

    Ok(Credentials {
        base_url: base_url.unwrap_or_default(),
        username: username.unwrap_or_default(),
        api_token: api_token.unwrap_or_default(),
    })
}

/// Resolve connection credentials from the process environment.
pub fn credentials() -> Result<Credentials, ConfigError> {
    credentials_with(&env_lookup)
}

/// Resolve the full sync configuration, flags beating environment variables.
///
/// Missing values across all six fields are reported in a single error.
pub fn sync_config_with(
    lookup: &dyn Fn(&str) -> Option<String>,
    overrides: &SyncOverrides,
) -> Result<SyncConfig, ConfigError> {
    let base_url = lookup(ENV_URL);
    let username = lookup(ENV_USERNAME);
    let api_token = lookup(ENV_API_TOKEN);
    let page_id = overrides.page_id.clone().or_else(|| lookup(ENV_PAGE_ID));
    let space_key = overrides.space_key.clone().or_else(|| lookup(ENV_SPACE_KEY));
    let markdown_path = overrides
        .markdown_path
        .clone()
        .or_else(|| lookup(ENV_MARKDOWN_PATH).map(PathBuf::from));

    let missing = missing_fields(&[
        (ENV_URL, base_url.is_some()),
        (ENV_USERNAME, username.is_some()),
        (ENV_API_TOKEN, api_token.is_some()),
        (ENV_PAGE_ID, page_id.is_some()),
        (ENV_SPACE_KEY, space_key.is_some()),
        (ENV_MARKDOWN_PATH, markdown_path.is_some()),
    ]);
    if !missing.is_empty() {
        return Err(ConfigError::Missing { vars: missing });
    }

    Ok(SyncConfig {
        credentials: Credentials {
            base_url: base_url.unwrap_or_default(),
            username: username.unwrap_or_default(),
            api_token: api_token.unwrap_or_default(),
        },
        page_id: PageId(page_id.unwrap_or_default()),
        space_key: SpaceKey(space_key.unwrap_or_default()),
        markdown_path: markdown_path.unwrap_or_default(),
    })
}

/// `sync_config_with` against the process environment.
pub fn sync_config(overrides: &SyncOverrides) -> Result<SyncConfig, ConfigError> {
    sync_config_with(&env_lookup, overrides)
}

/// Resolve credentials plus a target page id, reporting all four fields'
/// absences in one error.
pub fn credentials_and_page_with(
    lookup: &dyn Fn(&str) -> Option<String>,
    page_override: Option<String>,
) -> Result<(Credentials, PageId), ConfigError> {
    let base_url = lookup(ENV_URL);
    let username = lookup(ENV_USERNAME);
    let api_token = lookup(ENV_API_TOKEN);
    let page_id = page_override.or_else(|| lookup(ENV_PAGE_ID));

    let missing = missing_fields(&[
        (ENV_URL, base_url.is_some()),
        (ENV_USERNAME, username.is_some()),
        (ENV_API_TOKEN, api_token.is_some()),
        (ENV_PAGE_ID, page_id.is_some()),
    ]);
    if !missing.is_empty() {
        return Err(ConfigError::Missing { vars: missing });
    }

    Ok((
        Credentials {
            base_url: base_url.unwrap_or_default(),
            username: username.unwrap_or_default(),
            api_token: api_token.unwrap_or_default(),
        },
        PageId(page_id.unwrap_or_default()),
    ))
}

/// `credentials_and_page_with` against the process environment.
pub fn credentials_and_page(
    page_override: Option<String>,
) -> Result<(Credentials, PageId), ConfigError> {
    credentials_and_page_with(&env_lookup, page_override)
}

/// Resolve credentials plus a target space key, reporting all four fields'
/// absences in one error.
pub fn credentials_and_space_with(
    lookup: &dyn Fn(&str) -> Option<String>,
    space_override: Option<String>,
) -> Result<(Credentials, SpaceKey), ConfigError> {
    let base_url = lookup(ENV_URL);
    let username = lookup(ENV_USERNAME);
    let api_token = lookup(ENV_API_TOKEN);
    let space_key = space_override.or_else(|| lookup(ENV_SPACE_KEY));

    let missing = missing_fields(&[
        (ENV_URL, base_url.is_some()),
        (ENV_USERNAME, username.is_some()),
        (ENV_API_TOKEN, api_token.is_some()),
        (ENV_SPACE_KEY, space_key.is_some()),
    ]);
    if !missing.is_empty() {
        return Err(ConfigError::Missing { vars: missing });
    }

    Ok((
        Credentials {
            base_url: base_url.unwrap_or_default(),
            username: username.unwrap_or_default(),
            api_token: api_token.unwrap_or_default(),
        },
        SpaceKey(space_key.unwrap_or_default()),
    ))
}

/// `credentials_and_space_with` against the process environment.
pub fn credentials_and_space(
    space_override: Option<String>,
) -> Result<(Credentials, SpaceKey), ConfigError> {
    credentials_and_space_with(&env_lookup, space_override)
}

/// Pure validation helper: names of every field whose value is absent.
fn missing_fields(fields: &[(&str, bool)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
