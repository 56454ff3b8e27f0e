//! Static route catalog.
//!
//! The fixed, non-content application paths. Each path belongs to a
//! [`RouteClass`]; its priority and change frequency come from the policy table.

use chrono::NaiveDate;

use routemap_shared::{RouteClass, RouteEntry, RoutePolicy};

/// Application paths in manifest order.
pub const STATIC_ROUTES: &[(&str, RouteClass)] = &[
    ("/", RouteClass::Home),
    ("/login", RouteClass::Auth),
    ("/register", RouteClass::Auth),
    ("/watchlist", RouteClass::UserFeatures),
    ("/profile", RouteClass::Profile),
    ("/change-password", RouteClass::Account),
    ("/admin/login", RouteClass::Admin),
    ("/terms", RouteClass::Legal),
    ("/privacy", RouteClass::Legal),
    ("/static-movie", RouteClass::Content),
];

/// List the catalog routes, stamped with `today`.
pub fn list_static_routes(policy: &RoutePolicy, today: NaiveDate) -> Vec<RouteEntry> {
    STATIC_ROUTES
        .iter()
        .map(|&(path, class)| {
            let rule = policy.rule(class);
            RouteEntry {
                path: path.to_string(),
                priority: rule.priority,
                change_freq: rule.change_freq,
                last_modified: today,
            }
        })
        .collect()
}
