//! Distinct-value views: categories, tags, authors and series

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::content::Post;

/// Which post field a taxonomy is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Category,
    Tag,
    Author,
    Series,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 4] = [
        TaxonomyKind::Category,
        TaxonomyKind::Tag,
        TaxonomyKind::Author,
        TaxonomyKind::Series,
    ];

    /// URL segment under `/blog/`
    pub fn segment(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
            TaxonomyKind::Author => "author",
            TaxonomyKind::Series => "series",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "Category",
            TaxonomyKind::Tag => "Tag",
            TaxonomyKind::Author => "Author",
            TaxonomyKind::Series => "Series",
        }
    }

    fn position(self) -> usize {
        match self {
            TaxonomyKind::Category => 0,
            TaxonomyKind::Tag => 1,
            TaxonomyKind::Author => 2,
            TaxonomyKind::Series => 3,
        }
    }

    pub(crate) fn values(self, post: &Post) -> Vec<&str> {
        match self {
            TaxonomyKind::Category => vec![post.category.as_str()],
            TaxonomyKind::Tag => post.keywords.iter().map(String::as_str).collect(),
            TaxonomyKind::Author => post.author.as_deref().into_iter().collect(),
            TaxonomyKind::Series => post.series.as_deref().into_iter().collect(),
        }
    }
}

/// A distinct taxonomy value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    /// Display name (first spelling seen, newest post first)
    pub name: String,
    /// URL key, unique within its kind
    pub slug: String,
    /// Site-relative listing URL
    pub path: String,
    pub count: usize,
}

/// Distinct values of every kind, built once per collection
#[derive(Debug, Clone, Default)]
pub(crate) struct TaxonomyIndex {
    lists: [Vec<Taxonomy>; 4],
}

impl TaxonomyIndex {
    pub(crate) fn build(posts: &[&Post]) -> Self {
        let mut index = Self::default();
        for kind in TaxonomyKind::ALL {
            index.lists[kind.position()] = collect(posts, kind);
        }
        index
    }

    /// Values ordered alphabetically by lower-cased name
    pub(crate) fn list(&self, kind: TaxonomyKind) -> &[Taxonomy] {
        &self.lists[kind.position()]
    }

    /// Resolve a URL segment or a name to exactly one value.
    ///
    /// The URL key wins over a name so every listing URL stays reachable.
    pub(crate) fn resolve(&self, kind: TaxonomyKind, wanted: &str) -> Option<&Taxonomy> {
        let wanted = wanted.trim();
        if wanted.is_empty() {
            return None;
        }
        let list = self.list(kind);
        let lowered = wanted.to_lowercase();
        list.iter()
            .find(|t| t.slug == lowered)
            .or_else(|| list.iter().find(|t| names_match(&t.name, wanted)))
    }

    /// The value a post field belongs to, by name only
    pub(crate) fn lookup(&self, kind: TaxonomyKind, value: &str) -> Option<&Taxonomy> {
        self.list(kind).iter().find(|t| names_match(&t.name, value))
    }
}

/// Collect distinct values, ordered alphabetically by lower-cased name
fn collect(posts: &[&Post], kind: TaxonomyKind) -> Vec<Taxonomy> {
    let mut map: BTreeMap<String, Taxonomy> = BTreeMap::new();

    for post in posts {
        let mut seen_in_post = Vec::new();
        for value in kind.values(post) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let key = value.to_lowercase();
            // A post repeating a keyword counts once
            if seen_in_post.contains(&key) {
                continue;
            }
            seen_in_post.push(key.clone());

            map.entry(key)
                .or_insert_with(|| Taxonomy {
                    name: value.to_string(),
                    slug: String::new(),
                    path: String::new(),
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut list: Vec<Taxonomy> = map.into_values().collect();
    assign_slugs(&mut list, kind);
    list
}

/// Give every value its own URL key.
///
/// First claimant of a base slug keeps it; later ones get `-2`, `-3`, ...
/// skipping keys another value already owns.
fn assign_slugs(list: &mut [Taxonomy], kind: TaxonomyKind) {
    let bases: Vec<String> = list
        .iter()
        .map(|t| {
            let base = url_slug(&t.name);
            if base.is_empty() {
                kind.segment().to_string()
            } else {
                base
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::new();
    let mut pending = Vec::new();
    for (i, base) in bases.iter().enumerate() {
        if taken.insert(base.clone()) {
            list[i].slug = base.clone();
        } else {
            pending.push(i);
        }
    }

    for i in pending {
        let slug = (2..)
            .map(|n| format!("{}-{}", bases[i], n))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();
        taken.insert(slug.clone());
        list[i].slug = slug;
    }

    for taxonomy in list.iter_mut() {
        taxonomy.path = format!("/blog/{}/{}", kind.segment(), taxonomy.slug);
    }
}

/// Slug that keeps `C++` and `C#` apart from `C`
pub(crate) fn url_slug(value: &str) -> String {
    let spelled = value.replace('+', " plus ").replace('#', " sharp ");
    slug::slugify(spelled)
}

/// Name comparison shared by every lookup: trimmed, Unicode case-insensitive
pub(crate) fn names_match(value: &str, wanted: &str) -> bool {
    let value = value.trim();
    let wanted = wanted.trim();
    if value.is_empty() || wanted.is_empty() {
        return false;
    }
    value.to_lowercase() == wanted.to_lowercase()
}

pub(crate) fn post_matches(post: &Post, kind: TaxonomyKind, name: &str) -> bool {
    kind.values(post).into_iter().any(|v| names_match(v, name))
}
