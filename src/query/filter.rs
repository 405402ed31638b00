//! Post filtering

use serde::{Deserialize, Serialize};

use super::taxonomy::names_match;
use crate::content::Post;

/// Conjunctive filter over posts. Absent or blank fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub category: Option<String>,
    /// Free-text query, matched against title, description and keywords
    #[serde(alias = "q")]
    pub query: Option<String>,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    /// Whether no predicate is active
    pub fn is_empty(&self) -> bool {
        [&self.category, &self.query, &self.tag]
            .iter()
            .all(|f| active(f).is_none())
    }

    /// True when the post satisfies every active predicate
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category) = active(&self.category) {
            if !names_match(&post.category, category) {
                return false;
            }
        }

        if let Some(tag) = active(&self.tag) {
            if !post.keywords.iter().any(|k| names_match(k, tag)) {
                return false;
            }
        }

        if let Some(query) = active(&self.query) {
            if !post.haystack().contains(&query.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

/// Search hit as returned by `/api/search` and written to `search.json`:
/// the serialized post plus its site-relative URL
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub url: String,
}

impl<'a> SearchEntry<'a> {
    pub fn from_post(post: &'a Post) -> Self {
        Self {
            post,
            url: post.url_path(),
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::post;
    use crate::query::Blog;

    fn blog() -> Blog {
        let mut a = post("intro-python", (2024, 1, 1));
        a.title = "Intro to Python".into();
        a.category = "Python".into();
        a.keywords = vec!["beginner".into(), "Data Science".into()];

        let mut b = post("js-async", (2024, 2, 1));
        b.title = "Async JavaScript".into();
        b.description = "Promises without tears".into();
        b.category = "JavaScript".into();
        b.keywords = vec!["beginner".into()];

        let mut c = post("pandas", (2024, 3, 1));
        c.title = "Pandas tricks".into();
        c.category = "Python".into();
        c.keywords = vec!["data science".into()];

        Blog::from_posts(vec![a, b, c])
    }

    fn slugs(posts: Vec<&Post>) -> Vec<&str> {
        posts.into_iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let blog = blog();
        assert!(PostFilter::default().is_empty());
        assert_eq!(blog.filter(&PostFilter::default()).len(), 3);
        let blank = PostFilter {
            category: Some("  ".into()),
            query: Some(String::new()),
            tag: None,
        };
        assert!(blank.is_empty());
        assert_eq!(blog.filter(&blank).len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let blog = blog();
        let posts = blog.filter(&PostFilter::category("Python"));
        assert!(posts.iter().all(|p| p.category == "Python"));
        assert_eq!(slugs(posts), vec!["pandas", "intro-python"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let blog = blog();
        assert_eq!(slugs(blog.filter(&PostFilter::query("PROMISES"))), vec!["js-async"]);
        assert_eq!(slugs(blog.filter(&PostFilter::query("beginner"))).len(), 2);
        assert!(blog.filter(&PostFilter::query("rust")).is_empty());
    }

    #[test]
    fn test_predicates_are_anded() {
        let blog = blog();
        let filter = PostFilter {
            category: Some("Python".into()),
            query: None,
            tag: Some("beginner".into()),
        };
        assert_eq!(slugs(blog.filter(&filter)), vec!["intro-python"]);
    }

    #[test]
    fn test_tag_matches_slug_form() {
        let blog = blog();
        assert_eq!(slugs(blog.filter(&PostFilter::tag("data-science"))).len(), 2);
        assert_eq!(slugs(blog.filter(&PostFilter::tag("Data-Science"))).len(), 2);
    }

    #[test]
    fn test_search_entry_carries_the_post() {
        let blog = blog();
        let entry = SearchEntry::from_post(blog.find("js-async").unwrap());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["url"], "/blog/js-async");
        assert_eq!(value["slug"], "js-async");
        assert_eq!(value["date"], "2024-02-01T00:00:00Z");
        assert_eq!(value["keywords"], serde_json::json!(["beginner"]));
        assert_eq!(value["readingTime"], 1);
        assert_eq!(value["featured"], false);
        assert_eq!(value["draft"], false);
        for key in ["lastModified", "author", "series", "seriesPart", "image", "howto"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("html").is_none());
    }

    #[test]
    fn test_deserialize_from_query_params() {
        let filter: PostFilter = serde_json::from_str(r#"{"q":"python","tag":"beginner"}"#).unwrap();
        assert_eq!(filter.query.as_deref(), Some("python"));
        assert_eq!(filter.tag.as_deref(), Some("beginner"));
    }
}
