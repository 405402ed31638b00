//! Atom 1.0 feed

use chrono::{SecondsFormat, Utc};

use super::{absolutize_urls, escape_xml};
use crate::config::SiteConfig;
use crate::Blog;

/// Build the Atom feed for the latest published posts
pub fn build_atom(config: &SiteConfig, blog: &Blog) -> String {
    let base_url = config.base_url();
    let posts = blog.latest();
    let updated = posts
        .first()
        .map(|p| p.updated_at())
        .unwrap_or_else(Utc::now);

    let mut feed = String::with_capacity(4096);
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <subtitle>{}</subtitle>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
        escape_xml(base_url)
    ));
    feed.push_str(&format!("  <link href=\"{}/blog\"/>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "  <updated>{}</updated>\n",
        updated.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    feed.push_str(&format!("  <id>{}/</id>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&config.author)
    ));

    for post in posts.iter().take(config.feed_limit) {
        let link = escape_xml(&post.permalink(base_url));
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            post.effective_date()
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            post.updated_at().to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        if let Some(author) = &post.author {
            feed.push_str(&format!(
                "    <author><name>{}</name></author>\n",
                escape_xml(author)
            ));
        }
        feed.push_str(&format!(
            "    <summary>{}</summary>\n",
            escape_xml(&post.description)
        ));
        if !post.html.is_empty() {
            feed.push_str(&format!(
                "    <content type=\"html\">{}</content>\n",
                escape_xml(&absolutize_urls(&post.html, base_url))
            ));
        }
        feed.push_str(&format!(
            "    <category term=\"{}\"/>\n",
            escape_xml(&post.category)
        ));
        for keyword in &post.keywords {
            feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(keyword)));
        }
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::post;

    #[test]
    fn test_atom_entries() {
        let config = SiteConfig {
            url: "https://academy.example".to_string(),
            ..Default::default()
        };
        let mut a = post("intro", (2024, 1, 1));
        a.title = "Q&A: \"bootcamps\"".to_string();
        a.html = r#"<p><a href="/courses">Courses</a></p>"#.to_string();
        let mut b = post("hidden", (2024, 2, 1));
        b.draft = true;
        let blog = Blog::from_posts(vec![a, b]);

        let xml = build_atom(&config, &blog);
        assert!(xml.contains("<title>Q&amp;A: &quot;bootcamps&quot;</title>"));
        assert!(xml.contains("<link href=\"https://academy.example/blog/intro\"/>"));
        assert!(xml.contains("<published>2024-01-01T00:00:00Z</published>"));
        assert!(xml.contains("href=&quot;https://academy.example/courses&quot;"));
        assert!(xml.contains("<category term=\"General\"/>"));
        assert!(!xml.contains("hidden"));
        assert_eq!(xml.matches("<entry>").count(), 1);
    }
}
