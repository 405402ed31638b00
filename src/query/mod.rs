//! Query layer over the loaded post collection
//!
//! [`Blog`] holds every post read from the content directory (drafts
//! included) and answers the listing, filtering and grouping questions
//! the pages and feeds ask. Drafts never leave this module except
//! through [`Blog::all`].

mod archive;
mod filter;
mod paginate;
mod taxonomy;

pub use archive::{Archive, ArchiveEntry, ArchiveMonth, ArchiveYear};
pub use filter::{PostFilter, SearchEntry};
pub use paginate::{paginate, Paginated};
pub use taxonomy::{Taxonomy, TaxonomyKind};

use crate::content::{ContentError, ContentLoader, Post};
use crate::Site;
use taxonomy::TaxonomyIndex;

/// An in-memory post collection, sorted newest first by publication date
#[derive(Debug, Clone, Default)]
pub struct Blog {
    posts: Vec<Post>,
    taxonomies: TaxonomyIndex,
}

impl Blog {
    /// Read the collection fresh from the site's content directory
    pub fn load(site: &Site) -> Result<Self, ContentError> {
        let report = ContentLoader::new(site).load_posts()?;
        if !report.failures.is_empty() {
            tracing::warn!(
                "{} content file(s) skipped, see warnings above",
                report.failures.len()
            );
        }
        Ok(Self::from_posts(report.posts))
    }

    /// Build a collection from already parsed posts.
    ///
    /// Later posts whose slug is already taken are dropped.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut posts: Vec<Post> = posts
            .into_iter()
            .filter(|p| {
                let fresh = seen.insert(p.slug.clone());
                if !fresh {
                    tracing::warn!("Dropping post with duplicate slug {:?}", p.slug);
                }
                fresh
            })
            .collect();
        crate::content::loader::sort_by_date_desc(&mut posts);

        let published: Vec<&Post> = posts.iter().filter(|p| !p.draft).collect();
        let taxonomies = TaxonomyIndex::build(&published);
        Self { posts, taxonomies }
    }

    /// Every post, drafts included
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Published (non-draft) posts, newest first by publication date
    pub fn published(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| !p.draft).collect()
    }

    /// Published posts ordered by `last_modified ?? date`, newest first
    pub fn latest(&self) -> Vec<&Post> {
        let mut posts = self.published();
        posts.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        posts
    }

    /// Find a published post by slug
    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| !p.draft && p.slug == slug)
    }

    /// Published posts matching every predicate of the filter.
    ///
    /// Category and tag accept a listing slug as well as a name.
    pub fn filter(&self, filter: &PostFilter) -> Vec<&Post> {
        let resolved = PostFilter {
            category: self.resolve_name(TaxonomyKind::Category, filter.category.as_deref()),
            query: filter.query.clone(),
            tag: self.resolve_name(TaxonomyKind::Tag, filter.tag.as_deref()),
        };
        self.posts
            .iter()
            .filter(|p| !p.draft && resolved.matches(p))
            .collect()
    }

    fn resolve_name(&self, kind: TaxonomyKind, wanted: Option<&str>) -> Option<String> {
        let wanted = wanted?;
        Some(match self.taxonomies.resolve(kind, wanted) {
            Some(taxonomy) => taxonomy.name.clone(),
            None => wanted.to_string(),
        })
    }

    /// Search endpoint semantics: filter, then cap the result count
    pub fn search(&self, filter: &PostFilter, limit: usize) -> Vec<&Post> {
        let mut results = self.filter(filter);
        results.truncate(limit);
        results
    }

    /// Featured posts
    pub fn pinned_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| !p.draft && p.featured)
            .collect()
    }

    /// Posts carrying step-by-step metadata with at least two steps
    pub fn how_to_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| !p.draft && p.is_how_to())
            .collect()
    }

    /// Distinct categories with post counts
    pub fn categories(&self) -> Vec<Taxonomy> {
        self.taxonomies(TaxonomyKind::Category)
    }

    /// Distinct keywords with post counts
    pub fn tags(&self) -> Vec<Taxonomy> {
        self.taxonomies(TaxonomyKind::Tag)
    }

    /// Distinct authors with post counts
    pub fn authors(&self) -> Vec<Taxonomy> {
        self.taxonomies(TaxonomyKind::Author)
    }

    /// Distinct series with post counts
    pub fn series(&self) -> Vec<Taxonomy> {
        self.taxonomies(TaxonomyKind::Series)
    }

    /// Distinct values of any taxonomy kind
    pub fn taxonomies(&self, kind: TaxonomyKind) -> Vec<Taxonomy> {
        self.taxonomies.list(kind).to_vec()
    }

    /// Look up one taxonomy value by listing slug or name
    pub fn taxonomy(&self, kind: TaxonomyKind, wanted: &str) -> Option<Taxonomy> {
        self.taxonomies.resolve(kind, wanted).cloned()
    }

    /// Listing URL for a value as written on a post.
    ///
    /// Values only drafts carry have no listing; they get their plain slug.
    pub fn taxonomy_path(&self, kind: TaxonomyKind, value: &str) -> String {
        match self.taxonomies.lookup(kind, value) {
            Some(taxonomy) => taxonomy.path.clone(),
            None => {
                let base = taxonomy::url_slug(value);
                let slug = if base.is_empty() { kind.segment() } else { &base };
                format!("/blog/{}/{}", kind.segment(), slug)
            }
        }
    }

    /// Posts for a taxonomy value, given its listing slug or its name
    pub fn posts_for(&self, kind: TaxonomyKind, wanted: &str) -> Vec<&Post> {
        match self.taxonomies.resolve(kind, wanted) {
            Some(taxonomy) => self.taxonomy_posts(kind, taxonomy),
            None => Vec::new(),
        }
    }

    /// Posts carrying an already resolved taxonomy value
    pub fn taxonomy_posts(&self, kind: TaxonomyKind, taxonomy: &Taxonomy) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| !p.draft && taxonomy::post_matches(p, kind, &taxonomy.name))
            .collect();

        if kind == TaxonomyKind::Series {
            // Reading order: explicit part number first, then oldest first
            posts.sort_by(|a, b| {
                a.series_part
                    .unwrap_or(u32::MAX)
                    .cmp(&b.series_part.unwrap_or(u32::MAX))
                    .then_with(|| a.effective_date().cmp(&b.effective_date()))
            });
        }

        posts
    }

    pub fn category_posts(&self, name: &str) -> Vec<&Post> {
        self.posts_for(TaxonomyKind::Category, name)
    }

    pub fn tag_posts(&self, name: &str) -> Vec<&Post> {
        self.posts_for(TaxonomyKind::Tag, name)
    }

    pub fn author_posts(&self, name: &str) -> Vec<&Post> {
        self.posts_for(TaxonomyKind::Author, name)
    }

    pub fn series_posts(&self, name: &str) -> Vec<&Post> {
        self.posts_for(TaxonomyKind::Series, name)
    }

    /// Year → month grouping of published posts
    pub fn archive(&self) -> Archive {
        Archive::build(&self.published())
    }

    /// Posts sharing the category or keywords of `post`, best overlap first
    pub fn related(&self, post: &Post, limit: usize) -> Vec<&Post> {
        let keywords: Vec<String> = post.keywords.iter().map(|k| k.to_lowercase()).collect();
        let category = post.category.to_lowercase();

        let mut scored: Vec<(usize, &Post)> = self
            .posts
            .iter()
            .filter(|p| !p.draft && p.slug != post.slug)
            .map(|p| {
                let shared = p
                    .keywords
                    .iter()
                    .filter(|k| keywords.contains(&k.to_lowercase()))
                    .count();
                let same_category = usize::from(p.category.to_lowercase() == category);
                (shared * 2 + same_category, p)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps newest-first order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, p)| p).collect()
    }
}
