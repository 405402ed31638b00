//! academy-site: blog engine for a coding academy's marketing website
//!
//! Loads markdown posts with YAML front-matter, answers the listing and
//! search queries the site needs, and produces the SEO layer (RSS, Atom,
//! sitemap, robots.txt, JSON-LD). Pages are rendered with embedded Tera
//! templates, either on request by the axum server or ahead of time by
//! the static generator.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod lead;
pub mod query;
pub mod seo;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use query::Blog;

/// The site being served or built
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog content directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Read the blog collection fresh from disk
    pub fn load_blog(&self) -> Result<Blog, content::ContentError> {
        Blog::load(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, category: Option<&str>, draft: bool) -> Result<()> {
        commands::new::create_post(self, title, category, draft).map(|_| ())
    }
}
