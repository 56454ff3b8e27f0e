//! Bundled fallback-content extractor.
//!
//! The web bundle ships an offline catalogue (e.g. `staticMovies.js`) whose
//! entries carry `id: '<value>'` assignments. The resource is never executed;
//! identifiers are pattern-scanned out of its text:
//! - `id:` followed by optional whitespace and a single-, double- or
//!   back-tick-quoted literal
//! - every occurrence counts, regardless of nesting
//!
//! The scan cannot tell an entry's own `id` from any other field whose name
//! ends in `id` (`imdbid: '...'` also matches). JSON resources skip the scan
//! and are parsed as a typed array instead.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use routemap_shared::{ContentId, RouteMapError};
use tracing::{info, instrument, warn};

/// Matches `id: '<value>'`, `id: "<value>"` or ``id: `<value>` ``.
static ID_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"id:\s*['"`]([^'"`]+)['"`]"#).expect("id assignment regex")
});

/// Scan a resource's text for identifier assignments, in order of appearance.
pub fn extract_embedded_ids(source: &str) -> Vec<ContentId> {
    let ids: Vec<ContentId> = ID_ASSIGNMENT_RE
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.trim().is_empty())
        .map(ContentId::new)
        .collect();

    if ids.is_empty() {
        warn!("no content identifiers found in embedded resource");
    }

    ids
}

/// Read the bundled resource at `path` and extract its identifiers.
///
/// An unreadable file or a malformed JSON resource is logged and yields an
/// empty list.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_embedded_ids(path: &Path) -> Vec<ContentId> {
    let source = match tokio::fs::read_to_string(path).await {
        Ok(source) => source,
        Err(e) => {
            warn!(
                error = %RouteMapError::io(path, e),
                "could not read embedded content resource"
            );
            return Vec::new();
        }
    };

    let ids = if is_json(path) {
        match crate::parse_content_ids(&source) {
            Ok(ids) => {
                if ids.is_empty() {
                    warn!("no content identifiers found in embedded resource");
                }
                ids
            }
            Err(e) => {
                warn!(error = %e, "could not parse embedded content resource");
                Vec::new()
            }
        }
    } else {
        extract_embedded_ids(&source)
    };

    info!(count = ids.len(), "embedded content identifiers extracted");
    ids
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS_FIXTURE: &str = "../../../fixtures/embedded/staticMovies.js";
    const JSON_FIXTURE: &str = "../../../fixtures/embedded/staticMovies.json";

    fn ids(list: &[ContentId]) -> Vec<&str> {
        list.iter().map(ContentId::as_str).collect()
    }

    #[test]
    fn extract_from_fixture() {
        let content = std::fs::read_to_string(JS_FIXTURE).expect("read fixture");
        let extracted = extract_embedded_ids(&content);

        assert_eq!(
            ids(&extracted),
            vec!["the-silent-hills", "umuganura", "kigali-nights", "lake-kivu"]
        );
    }

    #[test]
    fn extract_all_quote_styles() {
        let source = "{ id: 'one' }, { id:\"two\" }, { id:   `three` }";
        assert_eq!(ids(&extract_embedded_ids(source)), vec!["one", "two", "three"]);
    }

    #[test]
    fn extract_without_matches_is_empty() {
        let source = "export const staticMovies = [{ title: 'No ids here' }];";
        assert!(extract_embedded_ids(source).is_empty());
    }

    #[test]
    fn extract_skips_blank_values() {
        let source = "{ id: '   ' }, { id: \"kigali-nights\" }, { id: `\t` }";
        assert_eq!(ids(&extract_embedded_ids(source)), vec!["kigali-nights"]);
    }

    #[test]
    fn extract_ignores_unquoted_values() {
        assert!(extract_embedded_ids("{ id: 42, id: someVariable }").is_empty());
    }

    #[test]
    fn extract_matches_suffixed_field_names() {
        // Documented limitation: any field ending in `id` is picked up.
        let source = "{ id: 'movie-1', imdbid: 'tt0111161' }";
        assert_eq!(ids(&extract_embedded_ids(source)), vec!["movie-1", "tt0111161"]);
    }

    #[tokio::test]
    async fn load_js_resource() {
        let loaded = load_embedded_ids(Path::new(JS_FIXTURE)).await;
        assert_eq!(loaded.len(), 4);
    }

    #[tokio::test]
    async fn load_json_resource_uses_typed_parse() {
        let loaded = load_embedded_ids(Path::new(JSON_FIXTURE)).await;
        assert_eq!(ids(&loaded), vec!["the-silent-hills", "umuganura"]);
    }

    #[tokio::test]
    async fn load_missing_file_yields_empty() {
        let missing = std::env::temp_dir()
            .join(format!("routemap-missing-{}", uuid::Uuid::now_v7()))
            .join("staticMovies.js");
        assert!(load_embedded_ids(&missing).await.is_empty());
    }

    #[tokio::test]
    async fn load_malformed_json_yields_empty() {
        let dir = std::env::temp_dir().join(format!("routemap-embedded-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("staticMovies.json");
        std::fs::write(&file, "[{\"id\": ").unwrap();

        assert!(load_embedded_ids(&file).await.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
