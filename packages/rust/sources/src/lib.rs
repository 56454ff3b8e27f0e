//! Content identifier sources.
//!
//! Two independent sources feed content routes into the manifest:
//! - the remote content API (`GET {api_base}/{collection}`), and
//! - the bundled fallback-content resource, see [`load_embedded_ids`].
//!
//! Both absorb their own failures. A broken source yields an empty list and a
//! warning, never an error, so the rest of the pipeline is unaffected by
//! backend unavailability.

mod embedded;

use std::time::Duration;

use reqwest::Client;
use routemap_shared::{ContentId, Result, RouteMapError};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

pub use embedded::{extract_embedded_ids, load_embedded_ids};

/// Maximum number of redirects to follow when fetching the collection.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for the collection request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum response size we consider valid (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("routemap/", env!("CARGO_PKG_VERSION"));

/// Identifier fields, in precedence order.
const ID_FIELDS: [&str; 2] = ["id", "_id"];

// ---------------------------------------------------------------------------
// Remote options
// ---------------------------------------------------------------------------

/// Where and how to fetch the remote collection.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Content API origin, e.g. `https://api.example.com/api`.
    pub api_base: String,
    /// Collection path under the API base (e.g., `movies`).
    pub collection: String,
    /// Timeout for the whole request in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5012/api".into(),
            collection: "movies".into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteOptions {
    /// The collection endpoint: `{api_base}/{collection}`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.collection.trim_matches('/')
        )
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch the content identifiers listed by the remote collection endpoint.
///
/// Makes a single attempt. A non-success status, transport error, timeout or
/// malformed payload is logged as a warning and yields an empty list.
#[instrument(skip_all, fields(endpoint = %opts.endpoint()))]
pub async fn fetch_content_ids(opts: &RemoteOptions) -> Vec<ContentId> {
    let endpoint = opts.endpoint();
    info!("fetching content identifiers");

    match try_fetch(opts, &endpoint).await {
        Ok(ids) => {
            info!(count = ids.len(), "content identifiers resolved");
            ids
        }
        Err(e) => {
            warn!(
                error = %e,
                "could not fetch content identifiers, continuing without remote routes"
            );
            Vec::new()
        }
    }
}

/// Parse a collection payload: a JSON array of content objects.
///
/// Each object contributes the value of `id`, or of `_id` when `id` yields
/// nothing. Non-blank strings and integers are accepted; objects without a
/// usable identifier are dropped.
pub fn parse_content_ids(body: &str) -> Result<Vec<ContentId>> {
    let items: Vec<Value> = serde_json::from_str(body).map_err(|e| {
        RouteMapError::parse(format!("expected a JSON array of content objects: {e}"))
    })?;

    let ids: Vec<ContentId> = items.iter().filter_map(identifier_of).collect();

    if ids.len() < items.len() {
        debug!(
            skipped = items.len() - ids.len(),
            "content objects without an identifier"
        );
    }

    Ok(ids)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn try_fetch(opts: &RemoteOptions, endpoint: &str) -> Result<Vec<ContentId>> {
    let client = build_client(opts)?;

    let response = client
        .get(endpoint)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| RouteMapError::Network(format!("{endpoint}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RouteMapError::Network(format!("{endpoint}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        check_response_size(endpoint, len)?;
    }

    let body = response
        .text()
        .await
        .map_err(|e| RouteMapError::Network(format!("{endpoint}: failed to read body: {e}")))?;

    // Chunked responses carry no Content-Length.
    check_response_size(endpoint, body.len() as u64)?;

    parse_content_ids(&body)
}

fn check_response_size(endpoint: &str, len: u64) -> Result<()> {
    if len > MAX_RESPONSE_SIZE {
        return Err(RouteMapError::validation(format!(
            "{endpoint}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
        )));
    }
    Ok(())
}

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &RemoteOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| RouteMapError::Network(format!("failed to build HTTP client: {e}")))
}

fn identifier_of(item: &Value) -> Option<ContentId> {
    ID_FIELDS
        .iter()
        .find_map(|field| item.get(field).and_then(scalar_identifier))
}

fn scalar_identifier(value: &Value) -> Option<ContentId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(ContentId::new(s.as_str())),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(ContentId::new(n.to_string())),
        _ => None,
    }
}
