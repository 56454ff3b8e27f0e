//! Artifact renderers: `sitemap.xml` and `robots.txt`.
//!
//! Both renderers are pure functions of their inputs. They do no I/O and
//! cannot fail; writing the results is the pipeline's job.

mod robots;
mod sitemap;

pub use robots::render_robots;
pub use sitemap::{SITEMAP_FILE_NAME, SITEMAP_NS, render_sitemap};

/// File name of the exclusion-rules document.
pub const ROBOTS_FILE_NAME: &str = "robots.txt";

/// Join an origin and a root-relative path with exactly one slash.
///
/// ```
/// use routemap_artifacts::absolute_url;
///
/// assert_eq!(absolute_url("https://example.com/", "/movie/a"), "https://example.com/movie/a");
/// assert_eq!(absolute_url("https://example.com", "terms"), "https://example.com/terms");
/// ```
pub fn absolute_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
