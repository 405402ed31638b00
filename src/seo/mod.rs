//! Structured data (JSON-LD) for search engines

use chrono::SecondsFormat;
use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::content::Post;

/// `BlogPosting` object for a post
pub fn blog_posting(config: &SiteConfig, post: &Post) -> Value {
    let url = post.permalink(config.base_url());
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.description,
        "datePublished": post.effective_date().to_rfc3339_opts(SecondsFormat::Secs, true),
        "dateModified": post.updated_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "url": url,
        "articleSection": post.category,
        "keywords": post.keywords.join(", "),
        "timeRequired": format!("PT{}M", post.reading_time),
        "author": person_or_org(config, post.author.as_deref()),
        "publisher": publisher(config),
    });

    if let Some(image) = &post.image {
        value["image"] = json!(absolute(config, image));
    }

    value
}

/// `HowTo` object, only for posts with listable step metadata
pub fn how_to(config: &SiteConfig, post: &Post) -> Option<Value> {
    let howto = post.howto.as_ref().filter(|h| h.is_listable())?;
    let url = post.permalink(config.base_url());

    let steps: Vec<Value> = howto
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mut value = json!({
                "@type": "HowToStep",
                "position": i + 1,
                "name": step.name,
                "text": step.text,
            });
            if let Some(step_url) = &step.url {
                value["url"] = json!(absolute(config, step_url));
            }
            value
        })
        .collect();

    let mut value = json!({
        "@context": "https://schema.org",
        "@type": "HowTo",
        "name": post.title,
        "description": post.description,
        "url": url,
        "step": steps,
    });

    if let Some(total_time) = &howto.total_time {
        value["totalTime"] = json!(total_time);
    }
    if !howto.tools.is_empty() {
        value["tool"] = howto
            .tools
            .iter()
            .map(|t| json!({ "@type": "HowToTool", "name": t }))
            .collect();
    }
    if !howto.supplies.is_empty() {
        value["supply"] = howto
            .supplies
            .iter()
            .map(|s| json!({ "@type": "HowToSupply", "name": s }))
            .collect();
    }
    if let Some(image) = &post.image {
        value["image"] = json!(absolute(config, image));
    }

    Some(value)
}

/// Home → Blog → Post breadcrumb trail
pub fn breadcrumbs(config: &SiteConfig, post: &Post) -> Value {
    let crumbs = [
        ("Home", config.full_url("/")),
        ("Blog", config.full_url("/blog")),
        (post.title.as_str(), post.permalink(config.base_url())),
    ];

    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// Every JSON-LD block for a post page, serialized for `<script>` tags
pub fn post_scripts(config: &SiteConfig, post: &Post) -> Vec<String> {
    let mut blocks = vec![blog_posting(config, post), breadcrumbs(config, post)];
    blocks.extend(how_to(config, post));
    blocks.iter().map(script_safe).collect()
}

/// Serialize so the output cannot close the surrounding `<script>` element
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn person_or_org(config: &SiteConfig, author: Option<&str>) -> Value {
    match author {
        Some(name) => json!({ "@type": "Person", "name": name }),
        None => json!({ "@type": "Organization", "name": config.organization }),
    }
}

fn publisher(config: &SiteConfig) -> Value {
    let mut value = json!({
        "@type": "Organization",
        "name": config.organization,
        "url": config.full_url("/"),
    });
    if let Some(logo) = &config.logo {
        value["logo"] = json!({ "@type": "ImageObject", "url": absolute(config, logo) });
    }
    value
}

fn absolute(config: &SiteConfig, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        config.full_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{HowTo, HowToStep};
    use crate::query::tests::post;

    fn config() -> SiteConfig {
        SiteConfig {
            url: "https://academy.example".to_string(),
            organization: "Academy".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blog_posting() {
        let mut p = post("intro", (2024, 1, 1));
        p.author = Some("Ada".to_string());
        p.image = Some("/images/intro.png".to_string());
        p.keywords = vec!["python".into(), "career".into()];

        let value = blog_posting(&config(), &p);
        assert_eq!(value["@type"], "BlogPosting");
        assert_eq!(value["url"], "https://academy.example/blog/intro");
        assert_eq!(value["datePublished"], "2024-01-01T00:00:00Z");
        assert_eq!(value["author"]["name"], "Ada");
        assert_eq!(value["keywords"], "python, career");
        assert_eq!(value["image"], "https://academy.example/images/intro.png");
        assert_eq!(value["publisher"]["name"], "Academy");
    }

    #[test]
    fn test_how_to() {
        let mut p = post("setup", (2024, 1, 1));
        assert!(how_to(&config(), &p).is_none());

        p.howto = Some(HowTo {
            total_time: Some("PT20M".into()),
            tools: vec!["Terminal".into()],
            supplies: vec![],
            steps: vec![
                HowToStep { name: "Install".into(), text: "Get it".into(), url: None },
                HowToStep { name: "Run".into(), text: "Go".into(), url: Some("/docs".into()) },
            ],
        });
        let value = how_to(&config(), &p).unwrap();
        assert_eq!(value["step"][1]["position"], 2);
        assert_eq!(value["step"][1]["url"], "https://academy.example/docs");
        assert_eq!(value["tool"][0]["name"], "Terminal");
        assert!(value.get("supply").is_none());
        assert_eq!(post_scripts(&config(), &p).len(), 3);
    }

    #[test]
    fn test_script_safe() {
        let mut p = post("x", (2024, 1, 1));
        p.title = "</script><script>alert(1)".to_string();
        let scripts = post_scripts(&config(), &p);
        assert!(scripts.iter().all(|s| !s.contains("</script>")));
    }
}
