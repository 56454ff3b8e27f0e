//! Sitemap rendering.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;

use routemap_shared::RouteEntry;

use crate::absolute_url;

/// Namespace of the sitemaps.org 0.9 schema.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// File name of the site-map document.
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Render the site-map document for `routes`, resolved against `base_url`.
///
/// Entries appear in input order. Locations are XML-escaped.
pub fn render_sitemap(routes: &[RouteEntry], base_url: &str) -> String {
    let mut xml = String::with_capacity(128 + routes.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for route in routes {
        let loc = absolute_url(base_url, &route.path);

        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&loc));
        xml.push_str("</loc>\n    <lastmod>");
        xml.push_str(&route.last_modified.format("%Y-%m-%d").to_string());
        xml.push_str("</lastmod>\n    <changefreq>");
        xml.push_str(route.change_freq.as_str());
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(&route.priority.to_string());
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use routemap_shared::{ChangeFrequency, Priority};

    fn entry(path: &str, tenths: u8, change_freq: ChangeFrequency) -> RouteEntry {
        RouteEntry {
            path: path.into(),
            priority: Priority::from_tenths(tenths),
            change_freq,
            last_modified: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_sitemap_empty() {
        let xml = render_sitemap(&[], "https://example.com");

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(xml.ends_with("</urlset>\n"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_sitemap_exact_layout() {
        let routes = vec![entry("/", 10, ChangeFrequency::Daily)];
        let xml = render_sitemap(&routes, "https://example.com");

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n  \
<url>\n    \
<loc>https://example.com/</loc>\n    \
<lastmod>2025-01-01</lastmod>\n    \
<changefreq>daily</changefreq>\n    \
<priority>1.0</priority>\n  \
</url>\n\
</urlset>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_sitemap_preserves_order() {
        let routes = vec![
            entry("/", 10, ChangeFrequency::Daily),
            entry("/movie/b", 9, ChangeFrequency::Weekly),
            entry("/movie/a", 9, ChangeFrequency::Weekly),
        ];
        let xml = render_sitemap(&routes, "https://example.com");

        let b = xml.find("/movie/b</loc>").expect("b rendered");
        let a = xml.find("/movie/a</loc>").expect("a rendered");
        assert!(b < a);
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("</url>").count(), 3);
    }

    #[test]
    fn test_sitemap_every_path_prefixed_once() {
        let routes = vec![
            entry("/", 10, ChangeFrequency::Daily),
            entry("/login", 8, ChangeFrequency::Monthly),
            entry("/static-movie/x", 9, ChangeFrequency::Weekly),
        ];

        for base in ["https://example.com", "https://example.com/"] {
            let xml = render_sitemap(&routes, base);
            for route in &routes {
                let loc = format!("<loc>https://example.com{}</loc>", route.path);
                assert!(xml.contains(&loc), "missing {loc} for base {base}");
            }
            assert!(!xml.contains("example.com//"));
        }
    }

    #[test]
    fn test_sitemap_escapes_reserved_characters() {
        let routes = vec![entry("/movie/tom&jerry<1>", 9, ChangeFrequency::Weekly)];
        let xml = render_sitemap(&routes, "https://example.com");

        assert!(xml.contains("<loc>https://example.com/movie/tom&amp;jerry&lt;1&gt;</loc>"));
        assert!(!xml.contains("tom&jerry"));
    }

    #[test]
    fn test_sitemap_priority_one_decimal() {
        let routes = vec![
            entry("/terms", 4, ChangeFrequency::Yearly),
            entry("/admin/login", 5, ChangeFrequency::Monthly),
        ];
        let xml = render_sitemap(&routes, "https://example.com");

        assert!(xml.contains("<priority>0.4</priority>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>"));
    }
}
