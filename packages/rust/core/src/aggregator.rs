//! Route aggregation.
//!
//! Merges the catalog with the remote and embedded content identifiers into
//! one ordered manifest: static routes, then remote content routes, then
//! embedded content routes. Each group keeps its upstream order.
//!
//! Groups are deduplicated on their own (a repeated path keeps the position
//! of its last occurrence) but never against each other; remote and embedded
//! routes live under different prefixes.

use std::collections::HashSet;

use chrono::NaiveDate;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::debug;

use routemap_shared::{ContentId, PolicyRule, RouteEntry, RoutePolicy, SourceCounts};

/// Path prefix of content routes resolved from the API.
pub const REMOTE_PREFIX: &str = "/movie/";

/// Path prefix of content routes from the bundled fallback resource.
pub const EMBEDDED_PREFIX: &str = "/static-movie/";

/// Bytes escaped when an identifier becomes a single path segment. Non-ASCII
/// is always escaped, so every content route is plain ASCII.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Aggregated manifest plus the per-group contribution after deduplication.
#[derive(Debug, Clone)]
pub struct AggregatedRoutes {
    pub routes: Vec<RouteEntry>,
    pub counts: SourceCounts,
}

/// Build the ordered route sequence for one manifest.
pub fn build_routes(
    static_routes: Vec<RouteEntry>,
    remote_ids: &[ContentId],
    embedded_ids: &[ContentId],
    policy: &RoutePolicy,
    today: NaiveDate,
) -> Vec<RouteEntry> {
    aggregate(static_routes, remote_ids, embedded_ids, policy, today).routes
}

/// Like [`build_routes`], also reporting how many routes each group kept.
pub fn aggregate(
    static_routes: Vec<RouteEntry>,
    remote_ids: &[ContentId],
    embedded_ids: &[ContentId],
    policy: &RoutePolicy,
    today: NaiveDate,
) -> AggregatedRoutes {
    let static_group = dedup_last_wins(static_routes);
    let remote_group =
        dedup_last_wins(content_routes(REMOTE_PREFIX, remote_ids, policy.content, today));
    let embedded_group =
        dedup_last_wins(content_routes(EMBEDDED_PREFIX, embedded_ids, policy.content, today));

    let counts = SourceCounts {
        static_routes: static_group.len(),
        remote: remote_group.len(),
        embedded: embedded_group.len(),
    };

    let mut routes = Vec::with_capacity(counts.total());
    routes.extend(static_group);
    routes.extend(remote_group);
    routes.extend(embedded_group);

    AggregatedRoutes { routes, counts }
}

/// Map identifiers to content routes under `prefix`, percent-encoding each
/// identifier as one path segment.
pub fn content_routes(
    prefix: &str,
    ids: &[ContentId],
    rule: PolicyRule,
    today: NaiveDate,
) -> Vec<RouteEntry> {
    ids.iter()
        .map(|id| RouteEntry {
            path: format!("{prefix}{}", utf8_percent_encode(id.as_str(), PATH_SEGMENT)),
            priority: rule.priority,
            change_freq: rule.change_freq,
            last_modified: today,
        })
        .collect()
}

/// Drop repeated paths, keeping each path at the position of its last occurrence.
fn dedup_last_wins(routes: Vec<RouteEntry>) -> Vec<RouteEntry> {
    let before = routes.len();
    let mut seen = HashSet::with_capacity(before);

    let mut kept: Vec<RouteEntry> = routes
        .into_iter()
        .rev()
        .filter(|route| seen.insert(route.path.clone()))
        .collect();
    kept.reverse();

    if kept.len() < before {
        debug!(dropped = before - kept.len(), "duplicate paths removed");
    }
    kept
}
