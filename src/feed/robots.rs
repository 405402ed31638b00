//! robots.txt

use crate::config::SiteConfig;

/// Allow crawling everywhere but the JSON API, and point at the sitemap
pub fn build_robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}\n",
        config.full_url("/sitemap.xml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots() {
        let config = SiteConfig {
            url: "https://academy.example/".to_string(),
            ..Default::default()
        };
        let robots = build_robots(&config);
        assert!(robots.starts_with("User-agent: *\n"));
        assert!(robots.contains("Disallow: /api/"));
        assert!(robots.ends_with("Sitemap: https://academy.example/sitemap.xml\n"));
    }
}
