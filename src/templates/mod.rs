//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary; the site has no theme directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::query::{Blog, Paginated, Taxonomy, TaxonomyKind};

/// Character budget for descriptions on post cards
const SUMMARY_CHARS: usize = 180;

/// Template renderer with the embedded blog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Templates escape user text explicitly; post HTML is trusted
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("listing.html", include_str!("blog/listing.html")),
            ("archive.html", include_str!("blog/archive.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            (
                "partials/post_card.html",
                include_str!("blog/partials/post_card.html"),
            ),
            (
                "partials/pager.html",
                include_str!("blog/partials/pager.html"),
            ),
            (
                "partials/sidebar.html",
                include_str!("blog/partials/sidebar.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Truncate plain text by character count, marking the cut with `...`.
///
/// Runs before HTML escaping so an entity is never split.
pub fn truncate_chars(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// Tera filter: reformat a `YYYY-MM-DD` string, e.g. `"LL"` → "May 30, 2023"
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %-d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

/// Escape text for HTML element and attribute content
pub fn escape_html(s: &str) -> String {
    tera::escape_html(s)
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub url: String,
    pub language: String,
    pub year: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            url: config.base_url().to_string(),
            language: config.language.clone(),
            year: chrono::Utc::now().format("%Y").to_string(),
        }
    }
}

/// Post summary for cards and listings; all text is pre-escaped
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Card-length description
    pub summary: String,
    pub date: String,
    pub path: String,
    pub category: TaxonomyLink,
    pub keywords: Vec<TaxonomyLink>,
    pub author: Option<TaxonomyLink>,
    pub series: Option<TaxonomyLink>,
    pub reading_time: usize,
    pub featured: bool,
    pub image: Option<String>,
}

impl PostData {
    /// Taxonomy links point at the listing URLs `blog` assigned
    pub fn from_post(post: &Post, blog: &Blog) -> Self {
        let link = |kind: TaxonomyKind, name: &str| TaxonomyLink::new(blog, kind, name);
        Self {
            slug: post.slug.clone(),
            title: escape_html(&post.title),
            description: escape_html(&post.description),
            summary: escape_html(&truncate_chars(&post.description, SUMMARY_CHARS)),
            date: post.effective_date().format("%Y-%m-%d").to_string(),
            path: post.url_path(),
            category: link(TaxonomyKind::Category, &post.category),
            keywords: post
                .keywords
                .iter()
                .map(|k| link(TaxonomyKind::Tag, k))
                .collect(),
            author: post.author.as_deref().map(|a| link(TaxonomyKind::Author, a)),
            series: post.series.as_deref().map(|s| link(TaxonomyKind::Series, s)),
            reading_time: post.reading_time,
            featured: post.featured,
            image: post.image.as_deref().map(escape_html),
        }
    }
}

/// A named link to a taxonomy listing
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyLink {
    pub name: String,
    pub path: String,
}

impl TaxonomyLink {
    pub fn new(blog: &Blog, kind: TaxonomyKind, name: &str) -> Self {
        Self {
            name: escape_html(name),
            path: blog.taxonomy_path(kind, name),
        }
    }
}

impl From<&Taxonomy> for TaxonomyLink {
    fn from(taxonomy: &Taxonomy) -> Self {
        Self {
            name: escape_html(&taxonomy.name),
            path: taxonomy.path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub prev_link: String,
    pub next_link: String,
}

impl PaginationData {
    /// Links follow `/blog/`, `/blog/page/2/`, ...
    pub fn new<T>(page: &Paginated<T>) -> Self {
        let link = |n: usize| {
            if n <= 1 {
                "/blog/".to_string()
            } else {
                format!("/blog/page/{}/", n)
            }
        };
        Self {
            current: page.page,
            total: page.total_pages,
            prev_link: if page.has_prev {
                link(page.page - 1)
            } else {
                String::new()
            },
            next_link: if page.has_next {
                link(page.page + 1)
            } else {
                String::new()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

impl NavPost {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: escape_html(&post.title),
            path: post.url_path(),
        }
    }
}
