//! Content loader - loads posts from the content directory

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{count_words, ContentError, FrontMatter, HowTo, MarkdownRenderer, ParseFailure, Post};
use crate::Site;

/// Outcome of one pass over the content directory
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully parsed posts, newest first
    pub posts: Vec<Post>,
    /// Files that were skipped, one entry per file
    pub failures: Vec<ContentError>,
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every post, isolating per-file failures.
    ///
    /// Only a missing content directory is an error; broken files are
    /// logged and reported in [`LoadReport::failures`].
    pub fn load_posts(&self) -> Result<LoadReport, ContentError> {
        let content_dir = &self.site.content_dir;
        if !content_dir.is_dir() {
            return Err(ContentError::MissingContentDir(content_dir.clone()));
        }

        let mut report = LoadReport::default();
        let mut seen_slugs = HashSet::new();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let result = self.load_post(path).and_then(|post| {
                if seen_slugs.insert(post.slug.clone()) {
                    Ok(post)
                } else {
                    Err(ContentError::parse(
                        path,
                        ParseFailure::DuplicateSlug(post.slug),
                    ))
                }
            });

            match result {
                Ok(post) => report.posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post: {}", e);
                    report.failures.push(e);
                }
            }
        }

        sort_by_date_desc(&mut report.posts);

        tracing::debug!(
            "Loaded {} posts ({} skipped) from {:?}",
            report.posts.len(),
            report.failures.len(),
            content_dir
        );

        Ok(report)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ContentError::parse(path, ParseFailure::Unreadable(e.to_string())))?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|reason| ContentError::parse(path, reason))?;

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ContentError::parse(path, ParseFailure::MissingField("title")))?
            .to_string();

        let raw_date = fm
            .date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ContentError::parse(path, ParseFailure::MissingField("date")))?;

        let date = fm.parse_date();
        if date.is_none() {
            tracing::warn!(
                "Invalid date {:?} in {:?}, falling back to now for sorting",
                raw_date,
                path
            );
        }

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slug::slugify)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ContentError::parse(path, ParseFailure::MissingField("slug")))?;

        let html = self
            .renderer
            .render(body)
            .map_err(|e| ContentError::parse(path, ParseFailure::Unreadable(e.to_string())))?;

        let file_modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let source = path
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let description = fm
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| fallback_description(body, &self.renderer));

        let words_per_minute = self.site.config.words_per_minute.max(1);
        let reading_time = count_words(&html).div_ceil(words_per_minute).max(1);

        let howto = if fm.howto_steps.is_empty() {
            None
        } else {
            Some(HowTo {
                total_time: fm.howto_total_time.clone(),
                tools: fm.howto_tools.clone(),
                supplies: fm.howto_supplies.clone(),
                steps: fm.howto_steps.clone(),
            })
        };

        let mut post = Post::new(slug, title, date);
        post.description = description;
        post.last_modified = fm.parse_last_modified();
        post.category = fm
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.site.config.default_category)
            .to_string();
        post.keywords = fm.keywords;
        post.content = body.to_string();
        post.html = html;
        post.reading_time = reading_time;
        post.draft = fm.draft;
        post.featured = fm.featured;
        post.author = fm.author.filter(|a| !a.trim().is_empty());
        post.series = fm.series.filter(|s| !s.trim().is_empty());
        post.series_part = fm.series_part;
        post.image = fm.image;
        post.howto = howto;
        post.source = source;
        post.file_modified = file_modified;

        Ok(post)
    }
}

/// Sort by publication date descending; unparseable dates count as now
pub fn sort_by_date_desc(posts: &mut [Post]) {
    let now = Utc::now();
    posts.sort_by(|a, b| {
        b.date
            .unwrap_or(now)
            .cmp(&a.date.unwrap_or(now))
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

/// Build a description from the excerpt or the first 160 characters of text
fn fallback_description(body: &str, renderer: &MarkdownRenderer) -> String {
    let source = MarkdownRenderer::split_excerpt(body).unwrap_or(body);
    let text = renderer
        .render(source)
        .map(|html| super::strip_html(&html))
        .unwrap_or_default();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= 160 {
        text
    } else {
        let truncated: String = text.chars().take(157).collect();
        format!("{}...", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site_with_posts(files: &[(&str, &str)]) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(&site.content_dir).unwrap();
        for (name, body) in files {
            let path = site.content_dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, body).unwrap();
        }
        (dir, site)
    }

    fn slugs(report: &LoadReport) -> Vec<&str> {
        report.posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_load_sorted_by_date_desc() {
        let (_dir, site) = site_with_posts(&[
            ("a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nBody A"),
            ("b.md", "---\ntitle: B\ndate: 2024-03-01\ndraft: true\n---\nBody B"),
            ("c.md", "---\ntitle: C\ndate: 2024-02-01\n---\nBody C"),
        ]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(slugs(&report), vec!["b", "c", "a"]);
        assert!(report.posts[0].draft);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_broken_files_are_isolated() {
        let (_dir, site) = site_with_posts(&[
            ("good.md", "---\ntitle: Good\ndate: 2024-01-01\n---\nok"),
            ("no-title.md", "---\ndate: 2024-01-01\n---\nmissing title"),
            ("no-date.md", "---\ntitle: No date\n---\nmissing date"),
            ("bad-yaml.md", "---\ntitle: [oops\n---\n"),
            ("plain.md", "just text, no frontmatter"),
            ("notes.txt", "ignored entirely"),
        ]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(slugs(&report), vec!["good"]);
        assert_eq!(report.failures.len(), 4);
        assert!(report.failures.iter().any(|f| matches!(
            f,
            ContentError::Parse { reason: ParseFailure::MissingField("title"), .. }
        )));
        assert!(report.failures.iter().any(|f| matches!(
            f,
            ContentError::Parse { reason: ParseFailure::MissingField("date"), .. }
        )));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let (_dir, site) = site_with_posts(&[
            ("intro.md", "---\ntitle: First\ndate: 2024-01-01\n---\n"),
            ("nested/intro.md", "---\ntitle: Second\ndate: 2024-02-01\n---\n"),
        ]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].title, "First");
        assert!(matches!(
            &report.failures[0],
            ContentError::Parse { reason: ParseFailure::DuplicateSlug(s), .. } if s == "intro"
        ));
    }

    #[test]
    fn test_invalid_date_is_soft() {
        let (_dir, site) = site_with_posts(&[
            ("old.md", "---\ntitle: Old\ndate: 2020-01-01\n---\n"),
            ("weird.md", "---\ntitle: Weird\ndate: sometime soon\n---\n"),
        ]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(slugs(&report), vec!["weird", "old"]);
        assert!(report.posts[0].date.is_none());
    }

    #[test]
    fn test_numeric_scalars_keep_the_post() {
        let (_dir, site) = site_with_posts(&[
            (
                "year-in-review.md",
                "---\ntitle: 2024\ndate: 2024-12-31\ncategory: 101\nkeywords:\n  - 3\n  - recap\nseries: Retro\nseriesPart: \"2\"\n---\nbody",
            ),
            ("csv.md", "---\ntitle: CSV\ndate: 2024-01-01\ntags: 42, python\n---\nbody"),
        ]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(slugs(&report), vec!["year-in-review", "csv"]);

        let post = &report.posts[0];
        assert_eq!(post.title, "2024");
        assert_eq!(post.category, "101");
        assert_eq!(post.keywords, vec!["3", "recap"]);
        assert_eq!(post.series_part, Some(2));
        assert_eq!(report.posts[1].keywords, vec!["42", "python"]);
    }

    #[test]
    fn test_missing_content_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        let err = ContentLoader::new(&site).load_posts().unwrap_err();
        assert!(matches!(err, ContentError::MissingContentDir(_)));
    }

    #[test]
    fn test_derived_fields() {
        let words = "word ".repeat(450);
        let post = format!(
            "---\ntitle: Long\ndate: 2024-01-01\nauthor: Ada\nseries: Web Basics\nseriesPart: 2\n---\nIntro line.\n\n<!-- more -->\n\n{}",
            words
        );
        let (_dir, site) = site_with_posts(&[("Long Post.md", &post)]);

        let report = ContentLoader::new(&site).load_posts().unwrap();
        let post = &report.posts[0];
        assert_eq!(post.slug, "long-post");
        assert_eq!(post.description, "Intro line.");
        assert_eq!(post.category, "General");
        assert_eq!(post.reading_time, 3);
        assert_eq!(post.author.as_deref(), Some("Ada"));
        assert_eq!(post.series_part, Some(2));
        assert!(post.file_modified.is_some());
        assert_eq!(post.source, "Long Post.md");
    }
}
