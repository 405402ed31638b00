//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::{Blog, Site};

/// Build the whole blog into the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let report = ContentLoader::new(site).load_posts()?;
    if !report.failures.is_empty() {
        tracing::warn!("Skipped {} file(s) that failed to parse", report.failures.len());
    }
    let blog = Blog::from_posts(report.posts);
    tracing::info!(
        "Loaded {} posts ({} published)",
        blog.all().len(),
        blog.published().len()
    );

    let written = Generator::new(site)?.generate(&blog)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} files in {:.2}s",
        written,
        duration.as_secs_f64()
    );

    Ok(())
}

/// Watch content and config, regenerating on change
pub async fn watch(site: &Site) -> Result<()> {
    let site = site.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&site)).await?
}

fn watch_blocking(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&site.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", site.content_dir);

    let config_path = config_path(site);
    if config_path.exists() {
        watcher.watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                if !event.paths.iter().any(|p| is_watched_file(p)) {
                    continue;
                }
                // Debounce: editors emit bursts of events per save
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = rebuild(site) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Re-read `_config.yml` before building so config edits apply
fn rebuild(site: &Site) -> Result<()> {
    let fresh = Site::new(&site.base_dir)?;
    run(&fresh)
}

fn config_path(site: &Site) -> PathBuf {
    site.base_dir.join("_config.yml")
}

fn is_watched_file(path: &Path) -> bool {
    if path.file_name().is_some_and(|n| n == "_config.yml") {
        return true;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown" | "mdx")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_watched_file() {
        assert!(is_watched_file(Path::new("/site/content/blog/intro.md")));
        assert!(is_watched_file(Path::new("/site/content/blog/intro.mdx")));
        assert!(is_watched_file(Path::new("/site/_config.yml")));
        assert!(!is_watched_file(Path::new("/site/content/blog/.intro.md.swp")));
        assert!(!is_watched_file(Path::new("/site/content/blog/cover.png")));
    }

    #[test]
    fn test_run_builds_public_dir() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-05-01\n---\n\nFirst post.\n",
        )
        .unwrap();
        fs::write(site.content_dir.join("broken.md"), "no front matter here").unwrap();

        run(&site).unwrap();
        assert!(site.public_dir.join("blog/hello/index.html").exists());
        assert!(site.public_dir.join("rss.xml").exists());
    }

    #[test]
    fn test_run_fails_without_content_dir() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        assert!(run(&site).is_err());
    }
}
