//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    pub language: String,
    /// Organization name used as JSON-LD publisher
    pub organization: String,
    pub logo: Option<String>,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    pub default_category: String,
    pub words_per_minute: usize,

    // Listing
    pub per_page: usize,
    pub search_limit: usize,
    pub feed_limit: usize,

    /// Routes that live outside the blog but belong in the sitemap
    pub static_routes: Vec<StaticRoute>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Coding Academy".to_string(),
            description: "Learn to code with hands-on bootcamps".to_string(),
            author: "Coding Academy".to_string(),
            email: "hello@example.com".to_string(),
            language: "en".to_string(),
            organization: "Coding Academy".to_string(),
            logo: None,

            url: "http://example.com".to_string(),

            content_dir: "content/blog".to_string(),
            public_dir: "public".to_string(),

            default_category: "General".to_string(),
            words_per_minute: 200,

            per_page: 6,
            search_limit: 25,
            feed_limit: 20,

            static_routes: default_static_routes(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Absolute URL for a site path
    pub fn full_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url())
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }
}

/// A non-blog route listed in the sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticRoute {
    pub path: String,
    #[serde(default = "default_changefreq")]
    pub changefreq: String,
    #[serde(default = "default_priority")]
    pub priority: f32,
}

impl StaticRoute {
    fn new(path: &str, changefreq: &str, priority: f32) -> Self {
        Self {
            path: path.to_string(),
            changefreq: changefreq.to_string(),
            priority,
        }
    }
}

fn default_changefreq() -> String {
    "monthly".to_string()
}

fn default_priority() -> f32 {
    0.5
}

fn default_static_routes() -> Vec<StaticRoute> {
    vec![
        StaticRoute::new("/", "weekly", 1.0),
        StaticRoute::new("/courses", "weekly", 0.9),
        StaticRoute::new("/locations", "monthly", 0.8),
        StaticRoute::new("/compare", "monthly", 0.7),
        StaticRoute::new("/blog", "daily", 0.8),
        StaticRoute::new("/contact", "yearly", 0.5),
    ]
}
