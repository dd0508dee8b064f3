//! The remote content API boundary.
//!
//! [`Remote`] is the narrow interface the pipelines consume; tests swap in an
//! in-memory fake. [`ConfluenceClient`] is the blocking ureq implementation:
//! one request per call, no concurrency, transport timeouts left at the
//! client defaults.
//!
//! Page updates write `version + 1` of whatever version is current at call
//! time. The remote rejects stale-version writes; this tool surfaces that
//! rejection and does not retry.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use caucus_core::config::Credentials;
use caucus_core::types::{PageId, SpaceKey};

/// Page size for paged label listings.
const LABEL_PAGE_LIMIT: usize = 200;
/// Single-shot limit for page listings.
const PAGE_LIST_LIMIT: usize = 1000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All errors that can arise from remote calls.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The remote answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never completed (DNS, TLS, connection, timeout).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The response body was not the JSON shape we expected.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

fn request_err(url: &str, err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, _) => RemoteError::Status {
            status,
            url: url.to_string(),
        },
        transport => RemoteError::Transport {
            url: url.to_string(),
            source: Box::new(transport),
        },
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A fetched page: display title, current version, storage-format body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    pub id: PageId,
    pub title: String,
    pub version: u64,
    pub body: String,
}

/// A page reference from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
}

/// One label occurrence from the space label listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLabel {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Remote trait
// ---------------------------------------------------------------------------

/// The remote content API consumed by the pipelines.
pub trait Remote {
    /// Cheap liveness/credential check.
    fn verify_connection(&self) -> Result<(), RemoteError>;

    /// Fetch a page with its storage-format body and version.
    fn fetch_page(&self, id: &PageId) -> Result<RemotePage, RemoteError>;

    /// Overwrite a page body, bumping the version by one.
    fn update_page(&self, id: &PageId, title: &str, body: &str) -> Result<(), RemoteError>;

    /// List pages in a space.
    fn list_space_pages(&self, space: &SpaceKey) -> Result<Vec<PageSummary>, RemoteError>;

    /// List direct child pages of a page.
    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, RemoteError>;

    /// Add a label to a page.
    fn add_label(&self, id: &PageId, label: &str) -> Result<(), RemoteError>;

    /// Every label occurrence in a space, across all result pages.
    fn space_labels(&self, space: &SpaceKey) -> Result<Vec<PageLabel>, RemoteError>;
}

// ---------------------------------------------------------------------------
// ConfluenceClient
// ---------------------------------------------------------------------------

/// Blocking Confluence REST client over ureq with basic auth.
pub struct ConfluenceClient {
    base_url: String,
    auth_header: String,
    agent: ureq::Agent,
}

impl fmt::Debug for ConfluenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The auth header embeds the API token; never print it.
        f.debug_struct("ConfluenceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Deserialize)]
struct PageEnvelope {
    id: String,
    title: String,
    version: VersionNode,
    body: BodyNode,
}

#[derive(Deserialize)]
struct VersionEnvelope {
    title: String,
    version: VersionNode,
}

#[derive(Deserialize)]
struct VersionNode {
    number: u64,
}

#[derive(Deserialize)]
struct BodyNode {
    storage: StorageNode,
}

#[derive(Deserialize)]
struct StorageNode {
    value: String,
}

#[derive(Deserialize)]
struct LabelEntry {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
}

impl ConfluenceClient {
    pub fn new(credentials: &Credentials) -> Self {
        let token = BASE64.encode(format!(
            "{}:{}",
            credentials.username, credentials.api_token
        ));
        ConfluenceClient {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {token}"),
            agent: ureq::agent(),
        }
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self
            .agent
            .get(url)
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| request_err(url, e))?;
        response.into_json().map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    fn put_json(&self, url: &str, payload: serde_json::Value) -> Result<(), RemoteError> {
        self.agent
            .put(url)
            .set("Authorization", &self.auth_header)
            .send_json(payload)
            .map_err(|e| request_err(url, e))?;
        Ok(())
    }

    fn post_json(&self, url: &str, payload: serde_json::Value) -> Result<(), RemoteError> {
        self.agent
            .post(url)
            .set("Authorization", &self.auth_header)
            .send_json(payload)
            .map_err(|e| request_err(url, e))?;
        Ok(())
    }
}

impl Remote for ConfluenceClient {
    fn verify_connection(&self) -> Result<(), RemoteError> {
        let url = format!("{}/rest/api/space?limit=1", self.base_url);
        self.get::<serde_json::Value>(&url).map(|_| ())
    }

    fn fetch_page(&self, id: &PageId) -> Result<RemotePage, RemoteError> {
        let url = format!(
            "{}/rest/api/content/{id}?expand=body.storage,version",
            self.base_url
        );
        let page: PageEnvelope = self.get(&url)?;
        Ok(RemotePage {
            id: PageId(page.id),
            title: page.title,
            version: page.version.number,
            body: page.body.storage.value,
        })
    }

    fn update_page(&self, id: &PageId, title: &str, body: &str) -> Result<(), RemoteError> {
        // Re-read the current version right before writing; a concurrent
        // writer between this read and the PUT surfaces as a status error.
        let version_url = format!("{}/rest/api/content/{id}?expand=version", self.base_url);
        let current: VersionEnvelope = self.get(&version_url)?;

        let url = format!("{}/rest/api/content/{id}", self.base_url);
        let payload = json!({
            "id": id.0,
            "type": "page",
            "title": if title.is_empty() { current.title.as_str() } else { title },
            "version": { "number": current.version.number + 1 },
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage",
                }
            }
        });
        self.put_json(&url, payload)
    }

    fn list_space_pages(&self, space: &SpaceKey) -> Result<Vec<PageSummary>, RemoteError> {
        let url = format!(
            "{}/rest/api/content?spaceKey={space}&type=page&start=0&limit={PAGE_LIST_LIMIT}",
            self.base_url
        );
        let envelope: ResultsEnvelope<PageSummary> = self.get(&url)?;
        Ok(envelope.results)
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, RemoteError> {
        let url = format!(
            "{}/rest/api/content/{id}/child/page?start=0&limit={PAGE_LIST_LIMIT}",
            self.base_url
        );
        let envelope: ResultsEnvelope<PageSummary> = self.get(&url)?;
        Ok(envelope.results)
    }

    fn add_label(&self, id: &PageId, label: &str) -> Result<(), RemoteError> {
        let url = format!("{}/rest/api/content/{id}/label", self.base_url);
        self.post_json(&url, json!([{ "prefix": "global", "name": label }]))
    }

    fn space_labels(&self, space: &SpaceKey) -> Result<Vec<PageLabel>, RemoteError> {
        let mut labels = Vec::new();
        let mut start = 0;
        loop {
            let url = format!(
                "{}/rest/api/content/{space}/label?start={start}&limit={LABEL_PAGE_LIMIT}",
                self.base_url
            );
            let envelope: ResultsEnvelope<LabelEntry> = self.get(&url)?;
            let batch = envelope.results.len();
            for entry in envelope.results {
                // Entries without both id and name are skipped, not errors.
                if let (Some(id), Some(name)) = (entry.id, entry.name) {
                    labels.push(PageLabel {
                        id: json_scalar_to_string(id),
                        name,
                    });
                }
            }
            if batch < LABEL_PAGE_LIMIT {
                break;
            }
            start += LABEL_PAGE_LIMIT;
        }
        Ok(labels)
    }
}

/// Label ids arrive as strings or numbers depending on deployment; normalise
/// both to a plain string.
fn json_scalar_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
