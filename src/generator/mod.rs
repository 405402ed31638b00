//! Generator module - writes the blog as static files into `public/`

mod pages;

pub use pages::{pagination_path, PageBuilder};

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feed;
use crate::query::{SearchEntry, TaxonomyKind};
use crate::{Blog, Site};

const TAXONOMY_KINDS: [TaxonomyKind; 4] = [
    TaxonomyKind::Category,
    TaxonomyKind::Tag,
    TaxonomyKind::Author,
    TaxonomyKind::Series,
];

/// Static site generator
pub struct Generator {
    site: Site,
    pages: PageBuilder,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            pages: PageBuilder::new(&site.config)?,
        })
    }

    /// Generate the entire blog surface; returns the number of files written
    pub fn generate(&self, blog: &Blog) -> Result<usize> {
        fs::create_dir_all(&self.site.public_dir)?;

        let mut written = 0;
        written += self.generate_index_pages(blog)?;
        written += self.generate_post_pages(blog)?;
        written += self.generate_taxonomy_pages(blog)?;
        written += self.generate_listing_pages(blog)?;
        written += self.generate_feeds(blog)?;
        written += self.generate_search_index(blog)?;

        Ok(written)
    }

    fn generate_index_pages(&self, blog: &Blog) -> Result<usize> {
        let total = self.pages.index_page_count(blog);
        for page in 1..=total {
            if let Some(html) = self.pages.index(blog, page)? {
                self.write_page(&pagination_path(page), &html)?;
            }
        }
        tracing::info!("Generated {} index page(s)", total);
        Ok(total)
    }

    fn generate_post_pages(&self, blog: &Blog) -> Result<usize> {
        let published = blog.published();
        for post in &published {
            if let Some(html) = self.pages.post(blog, &post.slug)? {
                self.write_page(&post.url_path(), &html)?;
            }
        }
        tracing::info!("Generated {} post page(s)", published.len());
        Ok(published.len())
    }

    fn generate_taxonomy_pages(&self, blog: &Blog) -> Result<usize> {
        let mut count = 0;
        for kind in TAXONOMY_KINDS {
            for taxonomy in blog.taxonomies(kind) {
                if let Some(html) = self.pages.taxonomy(blog, kind, &taxonomy.slug)? {
                    self.write_page(&taxonomy.path, &html)?;
                    count += 1;
                }
            }
        }
        tracing::info!("Generated {} taxonomy page(s)", count);
        Ok(count)
    }

    fn generate_listing_pages(&self, blog: &Blog) -> Result<usize> {
        self.write_page("/blog/archive", &self.pages.archive(blog)?)?;
        self.write_page("/blog/pinned", &self.pages.pinned(blog)?)?;
        self.write_page("/blog/how-to", &self.pages.how_to(blog)?)?;
        self.write_file("404.html", &self.pages.not_found(blog)?)?;
        Ok(4)
    }

    fn generate_feeds(&self, blog: &Blog) -> Result<usize> {
        let config = &self.site.config;
        self.write_file("rss.xml", &feed::build_rss(config, blog))?;
        self.write_file("atom.xml", &feed::build_atom(config, blog))?;
        self.write_file("sitemap.xml", &feed::build_sitemap(config, blog))?;
        self.write_file("robots.txt", &feed::build_robots(config))?;
        tracing::info!("Generated rss.xml, atom.xml, sitemap.xml and robots.txt");
        Ok(4)
    }

    /// Full published index for client-side search
    fn generate_search_index(&self, blog: &Blog) -> Result<usize> {
        let entries: Vec<SearchEntry> = blog
            .published()
            .into_iter()
            .map(SearchEntry::from_post)
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;
        self.write_file("search.json", &json)?;
        tracing::info!("Generated search.json");
        Ok(1)
    }

    /// Write an HTML page for a site path as `<path>/index.html`
    fn write_page(&self, site_path: &str, html: &str) -> Result<()> {
        let output_path = page_output_path(&self.site.public_dir, site_path);
        write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    fn write_file(&self, name: &str, contents: &str) -> Result<()> {
        write(&self.site.public_dir.join(name), contents)
    }
}

/// Output file for a site path, e.g. `/blog/intro` → `public/blog/intro/index.html`
pub fn page_output_path(public_dir: &Path, site_path: &str) -> PathBuf {
    let relative = site_path.trim_matches('/');
    if relative.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(relative).join("index.html")
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, frontmatter: &str) {
        fs::write(
            dir.join(name),
            format!("---\n{}\n---\n\nSome **body** text.\n", frontmatter),
        )
        .unwrap();
    }

    fn site_with_posts() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            url: "https://academy.example".into(),
            per_page: 1,
            ..Default::default()
        };
        let site = Site::with_config(tmp.path(), config);
        fs::create_dir_all(&site.content_dir).unwrap();

        write_post(
            &site.content_dir,
            "intro-python.md",
            "title: Intro to Python\ndate: 2024-01-10\ncategory: Python\nkeywords: [Data Science]",
        );
        write_post(
            &site.content_dir,
            "career-change.md",
            "title: Career change\ndate: 2024-02-10\nauthor: Ada Lovelace\nfeatured: true",
        );
        write_post(
            &site.content_dir,
            "secret.md",
            "title: Secret\ndate: 2024-03-10\ndraft: true",
        );
        (tmp, site)
    }

    #[test]
    fn test_page_output_path() {
        let public = Path::new("/srv/public");
        assert_eq!(
            page_output_path(public, "/blog/intro"),
            PathBuf::from("/srv/public/blog/intro/index.html")
        );
        assert_eq!(
            page_output_path(public, "/blog/page/2/"),
            PathBuf::from("/srv/public/blog/page/2/index.html")
        );
        assert_eq!(
            page_output_path(public, "/"),
            PathBuf::from("/srv/public/index.html")
        );
    }

    #[test]
    fn test_generate_writes_full_surface() {
        let (_tmp, site) = site_with_posts();
        let blog = site.load_blog().unwrap();
        let written = Generator::new(&site).unwrap().generate(&blog).unwrap();
        assert!(written > 10);

        let public = &site.public_dir;
        for file in [
            "blog/index.html",
            "blog/intro-python/index.html",
            "blog/career-change/index.html",
            "blog/category/python/index.html",
            "blog/tag/data-science/index.html",
            "blog/author/ada-lovelace/index.html",
            "blog/archive/index.html",
            "blog/pinned/index.html",
            "blog/how-to/index.html",
            "404.html",
            "rss.xml",
            "atom.xml",
            "sitemap.xml",
            "robots.txt",
            "search.json",
        ] {
            assert!(public.join(file).exists(), "missing {}", file);
        }
        assert!(!public.join("blog/secret/index.html").exists());
        // the featured post is pinned, leaving one paginated post
        assert!(!public.join("blog/page/2/index.html").exists());
    }

    #[test]
    fn test_search_index_excludes_drafts() {
        let (_tmp, site) = site_with_posts();
        let blog = site.load_blog().unwrap();
        Generator::new(&site).unwrap().generate(&blog).unwrap();

        let json = fs::read_to_string(site.public_dir.join("search.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        let slugs: Vec<&str> = entries.iter().filter_map(|e| e["slug"].as_str()).collect();
        assert_eq!(slugs, vec!["career-change", "intro-python"]);
        assert_eq!(entries[1]["url"], "/blog/intro-python");
        assert_eq!(entries[1]["readingTime"], 1);
        assert_eq!(entries[0]["author"], "Ada Lovelace");
    }

    #[test]
    fn test_similar_categories_get_their_own_pages() {
        let (_tmp, site) = site_with_posts();
        write_post(
            &site.content_dir,
            "c-intro.md",
            "title: Pointers in C\ndate: 2024-04-01\ncategory: C",
        );
        write_post(
            &site.content_dir,
            "cpp-intro.md",
            "title: Templates in C++\ndate: 2024-04-02\ncategory: C++",
        );
        write_post(
            &site.content_dir,
            "csharp-intro.md",
            "title: LINQ in C#\ndate: 2024-04-03\ncategory: \"C#\"",
        );
        let blog = site.load_blog().unwrap();
        Generator::new(&site).unwrap().generate(&blog).unwrap();

        let category = |slug: &str| {
            fs::read_to_string(site.public_dir.join(format!("blog/category/{}/index.html", slug)))
                .unwrap()
        };
        let c = category("c");
        assert!(c.contains("Pointers in C"));
        assert!(!c.contains("Templates in C++"));
        assert!(category("c-plus-plus").contains("Templates in C++"));
        assert!(category("c-sharp").contains("LINQ in C#"));
    }
}
