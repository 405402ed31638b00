//! Sitemap generation.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/intro</loc>
//!     <lastmod>2025-01-01T00:00:00Z</lastmod>
//!   </url>
//! </urlset>
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use super::escape_xml;
use crate::config::SiteConfig;
use crate::Blog;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Single URL entry in the sitemap
struct UrlEntry {
    loc: String,
    lastmod: DateTime<Utc>,
    changefreq: String,
    priority: f32,
}

/// Build the sitemap: static routes, then one entry per published post
pub fn build_sitemap(config: &SiteConfig, blog: &Blog) -> String {
    let now = Utc::now();
    let posts = blog.latest();
    let newest_post = posts.first().map(|p| p.updated_at());

    let mut urls: Vec<UrlEntry> = config
        .static_routes
        .iter()
        .map(|route| UrlEntry {
            loc: config.full_url(&route.path),
            // The blog index changes whenever a post does
            lastmod: match (route.path.trim_end_matches('/'), newest_post) {
                ("/blog", Some(newest)) => newest,
                _ => now,
            },
            changefreq: route.changefreq.clone(),
            priority: route.priority,
        })
        .collect();

    urls.extend(posts.iter().map(|post| UrlEntry {
        loc: post.permalink(config.base_url()),
        lastmod: post.file_modified.unwrap_or_else(|| post.updated_at()),
        changefreq: "monthly".to_string(),
        priority: 0.7,
    }));

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            escape_xml(&entry.changefreq)
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
