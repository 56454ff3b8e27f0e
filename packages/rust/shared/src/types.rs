//! Core domain types for routemap manifests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RouteMapError};

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one generation run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ContentId
// ---------------------------------------------------------------------------

/// Opaque token naming one content item.
///
/// Only ever interpolated into a path template; no further structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Advisory crawl-priority weight in `[0.0, 1.0]`.
///
/// Displays with exactly one decimal digit (`0.9`, `1.0`), which is the
/// form written into `<priority>`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Priority(f64);

impl Priority {
    /// Build a priority from tenths (`9` → `0.9`). Values above ten saturate at `1.0`.
    pub const fn from_tenths(tenths: u8) -> Self {
        let tenths = if tenths > 10 { 10 } else { tenths };
        Self(tenths as f64 / 10.0)
    }

    /// Validate and wrap a raw priority value.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(RouteMapError::validation(format!(
                "priority {value} is outside [0.0, 1.0]"
            )));
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Priority {
    type Error = RouteMapError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for f64 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ChangeFrequency
// ---------------------------------------------------------------------------

/// How often a page is expected to change (`<changefreq>` vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// The lowercase token used in site-map documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = RouteMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(RouteMapError::validation(format!(
                "unknown change frequency '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// RouteClass
// ---------------------------------------------------------------------------

/// Policy bucket a route belongs to; selects its priority and change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Home,
    Auth,
    UserFeatures,
    Profile,
    Account,
    Admin,
    Legal,
    /// Content landing and detail pages (catalog, remote and embedded).
    Content,
}

// ---------------------------------------------------------------------------
// RouteEntry
// ---------------------------------------------------------------------------

/// Metadata for one crawlable URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Root-relative path (e.g., `/movie/42`). Unique within its source group.
    pub path: String,
    /// Advisory crawl priority.
    pub priority: Priority,
    /// Expected change frequency.
    pub change_freq: ChangeFrequency,
    /// Calendar date of last modification (the generation date).
    pub last_modified: NaiveDate,
}

// ---------------------------------------------------------------------------
// SourceCounts
// ---------------------------------------------------------------------------

/// Number of routes each source contributed to one manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    /// Routes from the static catalog.
    pub static_routes: usize,
    /// Content routes resolved from the remote API.
    pub remote: usize,
    /// Content routes extracted from the embedded fallback resource.
    pub embedded: usize,
}

impl SourceCounts {
    pub fn total(&self) -> usize {
        self.static_routes + self.remote + self.embedded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_displays_one_decimal() {
        assert_eq!(Priority::from_tenths(10).to_string(), "1.0");
        assert_eq!(Priority::from_tenths(9).to_string(), "0.9");
        assert_eq!(Priority::from_tenths(0).to_string(), "0.0");
        assert_eq!(Priority::new(0.66).unwrap().to_string(), "0.7");
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert!(Priority::new(1.5).is_err());
        assert!(Priority::new(-0.1).is_err());
        assert!(Priority::new(f64::NAN).is_err());
        assert!(Priority::new(1.0).is_ok());
    }

    #[test]
    fn priority_saturates_tenths() {
        assert_eq!(Priority::from_tenths(42), Priority::from_tenths(10));
    }

    #[test]
    fn change_frequency_tokens() {
        for freq in [
            ChangeFrequency::Always,
            ChangeFrequency::Hourly,
            ChangeFrequency::Daily,
            ChangeFrequency::Weekly,
            ChangeFrequency::Monthly,
            ChangeFrequency::Yearly,
            ChangeFrequency::Never,
        ] {
            let parsed: ChangeFrequency = freq.as_str().parse().expect("parse token");
            assert_eq!(parsed, freq);
        }
        assert!("fortnightly".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn route_entry_serialization() {
        let entry = RouteEntry {
            path: "/movie/a".into(),
            priority: Priority::from_tenths(9),
            change_freq: ChangeFrequency::Weekly,
            last_modified: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        };

        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["change_freq"], "weekly");
        assert_eq!(json["last_modified"], "2025-03-14");
        assert_eq!(json["priority"], 0.9);

        let parsed: RouteEntry = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, entry);
    }

    #[test]
    fn route_entry_rejects_bad_priority() {
        let json = serde_json::json!({
            "path": "/",
            "priority": 2.0,
            "change_freq": "daily",
            "last_modified": "2025-01-01"
        });
        assert!(serde_json::from_value::<RouteEntry>(json).is_err());
    }

    #[test]
    fn source_counts_total() {
        let counts = SourceCounts {
            static_routes: 10,
            remote: 2,
            embedded: 1,
        };
        assert_eq!(counts.total(), 13);
    }
}
