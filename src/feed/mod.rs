//! Feed generation: RSS 2.0, Atom 1.0, sitemap and robots.txt
//!
//! All generators take the loaded [`Blog`](crate::Blog) and read only
//! published posts, newest first by `last_modified ?? date`.

mod atom;
mod robots;
mod rss;
mod sitemap;

pub use atom::build_atom;
pub use robots::build_robots;
pub use rss::build_rss;
pub use sitemap::build_sitemap;

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    strip_invalid_xml_chars(s)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wrap text in a CDATA section, splitting any embedded `]]>`
pub fn cdata(s: &str) -> String {
    let clean = strip_invalid_xml_chars(s);
    format!("<![CDATA[{}]]>", clean.replace("]]>", "]]]]><![CDATA[>"))
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

/// Convert relative URLs in HTML content to absolute URLs
fn absolutize_urls(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}
