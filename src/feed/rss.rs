//! RSS 2.0 feed

use chrono::Utc;

use super::{absolutize_urls, cdata, escape_xml};
use crate::config::SiteConfig;
use crate::Blog;

/// Build the RSS feed for the latest published posts
pub fn build_rss(config: &SiteConfig, blog: &Blog) -> String {
    let base_url = config.base_url();
    let posts = blog.latest();
    let last_build = posts
        .first()
        .map(|p| p.updated_at())
        .unwrap_or_else(Utc::now);

    let mut feed = String::with_capacity(4096);
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(
        r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#,
    );
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!("    <link>{}/blog</link>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.language)
    ));
    feed.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        last_build.to_rfc2822()
    ));
    feed.push_str(&format!(
        "    <atom:link href=\"{}/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(base_url)
    ));

    for post in posts.iter().take(config.feed_limit) {
        let link = escape_xml(&post.permalink(base_url));
        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", link));
        feed.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            post.effective_date().to_rfc2822()
        ));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            cdata(&post.description)
        ));
        if !post.html.is_empty() {
            feed.push_str(&format!(
                "      <content:encoded>{}</content:encoded>\n",
                cdata(&absolutize_urls(&post.html, base_url))
            ));
        }
        if let Some(author) = &post.author {
            feed.push_str(&format!(
                "      <author>{} ({})</author>\n",
                escape_xml(&config.email),
                escape_xml(author)
            ));
        }
        feed.push_str(&format!(
            "      <category>{}</category>\n",
            escape_xml(&post.category)
        ));
        for keyword in &post.keywords {
            feed.push_str(&format!("      <category>{}</category>\n", escape_xml(keyword)));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}
