//! Robots.txt rendering.

use crate::absolute_url;
use crate::sitemap::SITEMAP_FILE_NAME;

/// Path prefixes crawlers must stay out of.
const DISALLOWED_PREFIXES: &[&str] = &["/admin/", "/api/"];

/// Public prefixes restated as explicitly allowed.
const ALLOWED_PREFIXES: &[&str] = &[
    "/",
    "/movie/",
    "/static-movie/",
    "/watchlist",
    "/profile",
    "/terms",
    "/privacy",
];

/// Advisory delay between requests, in seconds.
const CRAWL_DELAY_SECS: u32 = 1;

/// Render the exclusion-rules document for the site at `base_url`.
///
/// Allow-all default, the admin and API prefixes disallowed, public prefixes
/// restated, plus the absolute site-map location and a crawl delay.
pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut out = String::with_capacity(512);

    out.push_str(&format!("# Robots.txt for {base}\n"));
    out.push_str("User-agent: *\n");
    out.push_str("Allow: /\n\n");

    out.push_str("# Sitemap location\n");
    out.push_str(&format!(
        "Sitemap: {}\n\n",
        absolute_url(base, SITEMAP_FILE_NAME)
    ));

    out.push_str("# Disallow admin routes\n");
    for prefix in DISALLOWED_PREFIXES {
        out.push_str(&format!("Disallow: {prefix}\n"));
    }
    out.push('\n');

    out.push_str("# Allow public routes\n");
    for prefix in ALLOWED_PREFIXES {
        out.push_str(&format!("Allow: {prefix}\n"));
    }
    out.push('\n');

    out.push_str("# Crawl delay (optional)\n");
    out.push_str(&format!("Crawl-delay: {CRAWL_DELAY_SECS}\n"));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_exact_layout() {
        let expected = "# Robots.txt for https://example.com
User-agent: *
Allow: /

# Sitemap location
Sitemap: https://example.com/sitemap.xml

# Disallow admin routes
Disallow: /admin/
Disallow: /api/

# Allow public routes
Allow: /
Allow: /movie/
Allow: /static-movie/
Allow: /watchlist
Allow: /profile
Allow: /terms
Allow: /privacy

# Crawl delay (optional)
Crawl-delay: 1
";
        assert_eq!(render_robots("https://example.com"), expected);
    }

    #[test]
    fn robots_trailing_slash_base() {
        let robots = render_robots("https://example.com/");
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml\n"));
        assert!(robots.starts_with("# Robots.txt for https://example.com\n"));
    }
}
