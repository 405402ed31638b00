//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier, taken from the source filename
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Publication date; `None` when the frontmatter value could not be parsed
    pub date: Option<DateTime<Utc>>,

    pub last_modified: Option<DateTime<Utc>>,

    pub category: String,

    /// Ordered keyword list (display order)
    pub keywords: Vec<String>,

    /// Raw markdown body
    #[serde(skip)]
    pub content: String,

    /// Rendered HTML
    #[serde(skip)]
    pub html: String,

    /// Estimated minutes to read
    pub reading_time: usize,

    pub draft: bool,

    pub featured: bool,

    pub author: Option<String>,

    pub series: Option<String>,

    pub series_part: Option<u32>,

    pub image: Option<String>,

    pub howto: Option<HowTo>,

    /// Source file path relative to the content directory
    #[serde(skip)]
    pub source: String,

    /// Filesystem modification time of the source file
    #[serde(skip)]
    pub file_modified: Option<DateTime<Utc>>,
}

/// Structured step-by-step metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HowTo {
    pub total_time: Option<String>,
    pub tools: Vec<String>,
    pub supplies: Vec<String>,
    pub steps: Vec<HowToStep>,
}

/// A single how-to step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl HowTo {
    /// Step-by-step guides need at least two steps to be listed
    pub fn is_listable(&self) -> bool {
        self.steps.len() >= 2
    }
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: Option<DateTime<Utc>>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: String::new(),
            date,
            last_modified: None,
            category: String::new(),
            keywords: Vec::new(),
            content: String::new(),
            html: String::new(),
            reading_time: 1,
            draft: false,
            featured: false,
            author: None,
            series: None,
            series_part: None,
            image: None,
            howto: None,
            source: String::new(),
            file_modified: None,
        }
    }

    /// Publication date, falling back to now when it could not be parsed
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or_else(Utc::now)
    }

    /// Sort key for "latest first" views: `last_modified ?? date`
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.last_modified.unwrap_or_else(|| self.effective_date())
    }

    /// Site-relative URL path
    pub fn url_path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Absolute URL under the given site URL
    pub fn permalink(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.url_path())
    }

    /// Whether the post carries listable how-to metadata
    pub fn is_how_to(&self) -> bool {
        self.howto.as_ref().is_some_and(HowTo::is_listable)
    }

    /// Text the search and filter operations match against
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.keywords.join(" ")
        )
        .to_lowercase()
    }

    /// Get the previous (newer) post in a list
    pub fn prev<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).map(|i| posts[i])
    }

    /// Get the next (older) post in a list
    pub fn next<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1).copied()
    }
}
