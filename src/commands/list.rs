//! List site content

use anyhow::Result;
use std::fmt::Write as _;

use crate::content::ContentLoader;
use crate::query::TaxonomyKind;
use crate::{Blog, Site};

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let report = ContentLoader::new(site).load_posts()?;
    for failure in &report.failures {
        eprintln!("skipped: {}", failure);
    }
    let blog = Blog::from_posts(report.posts);
    print!("{}", render(&blog, content_type)?);
    Ok(())
}

/// Text listing for one content type
pub fn render(blog: &Blog, content_type: &str) -> Result<String> {
    let mut out = String::new();

    let kind = match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", blog.all().len())?;
            for post in blog.all() {
                let date = post
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                let draft = if post.draft { " (draft)" } else { "" };
                writeln!(out, "  {} - {}{} [{}]", date, post.title, draft, post.slug)?;
            }
            return Ok(out);
        }
        "tag" | "tags" => TaxonomyKind::Tag,
        "category" | "categories" => TaxonomyKind::Category,
        "author" | "authors" => TaxonomyKind::Author,
        "series" => TaxonomyKind::Series,
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, author, series",
                content_type
            );
        }
    };

    let values = blog.taxonomies(kind);
    writeln!(out, "{} ({}):", kind.label(), values.len())?;
    for value in values {
        writeln!(out, "  {} ({})", value.name, value.count)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::post;

    fn blog() -> Blog {
        let mut a = post("a", (2024, 1, 1));
        a.title = "Intro".into();
        a.keywords = vec!["python".into(), "Career".into()];
        let mut b = post("b", (2024, 2, 1));
        b.title = "Later".into();
        b.keywords = vec!["Python".into()];
        b.draft = true;
        Blog::from_posts(vec![a, b])
    }

    #[test]
    fn test_list_posts_includes_drafts() {
        let out = render(&blog(), "posts").unwrap();
        assert!(out.starts_with("Posts (2):"));
        assert!(out.contains("2024-02-01 - Later (draft) [b]"));
        assert!(out.contains("2024-01-01 - Intro [a]"));
    }

    #[test]
    fn test_list_tags_counts_published_only() {
        let out = render(&blog(), "tag").unwrap();
        assert_eq!(out, "Tag (2):\n  Career (1)\n  python (1)\n");
    }

    #[test]
    fn test_unknown_type() {
        assert!(render(&blog(), "pages").is_err());
    }
}
