//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Front matter written for a fresh post
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    date: String,
    description: &'a str,
    category: &'a str,
    keywords: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    draft: bool,
}

/// Create a new post in the content directory and return its path
pub fn create_post(site: &Site, title: &str, category: Option<&str>, draft: bool) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        description: "",
        category: category.unwrap_or(&site.config.default_category),
        keywords: Vec::new(),
        draft,
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&scaffold)?);

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}
