//! Page rendering shared by the static generator and the server

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::query::{paginate, PostFilter, TaxonomyKind};
use crate::seo;
use crate::templates::{
    escape_html, NavPost, PaginationData, PostData, SiteData, TaxonomyLink, TemplateRenderer,
};
use crate::Blog;

/// Number of related posts shown under an article
const RELATED_POSTS: usize = 3;

/// Renders blog pages from a loaded collection
pub struct PageBuilder {
    config: SiteConfig,
    renderer: TemplateRenderer,
}

impl PageBuilder {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Create a base context with common variables
    fn create_base_context(&self, blog: &Blog, current_path: &str) -> Context {
        let categories: Vec<TaxonomyLink> = blog.categories().iter().map(Into::into).collect();
        let series: Vec<TaxonomyLink> = blog.series().iter().map(Into::into).collect();

        let mut context = Context::new();
        context.insert("site", &SiteData::from_config(&self.config));
        context.insert("current_path", current_path);
        context.insert("categories", &categories);
        context.insert("series", &series);
        context
    }

    /// Non-featured posts, latest first; featured ones are pinned above page 1
    fn index_posts<'a>(&self, blog: &'a Blog) -> Vec<&'a Post> {
        blog.latest().into_iter().filter(|p| !p.featured).collect()
    }

    /// Number of index pages for the collection (at least one)
    pub fn index_page_count(&self, blog: &Blog) -> usize {
        let posts = self.index_posts(blog);
        paginate(&posts, 1, self.config.per_page)
            .total_pages
            .max(1)
    }

    /// Paginated blog index; `None` past the last page
    pub fn index(&self, blog: &Blog, page: usize) -> Result<Option<String>> {
        let listed = self.index_posts(blog);
        let page = paginate(&listed, page, self.config.per_page);
        if page.items.is_empty() && page.page > 1 {
            return Ok(None);
        }

        let pinned: Vec<PostData> = if page.page == 1 {
            blog.pinned_posts()
                .into_iter()
                .map(|p| PostData::from_post(p, blog))
                .collect()
        } else {
            Vec::new()
        };
        let posts: Vec<PostData> = page
            .items
            .iter()
            .map(|p| PostData::from_post(p, blog))
            .collect();

        let pagination = PaginationData::new(&page);
        let mut context = self.create_base_context(blog, &pagination_path(page.page));
        context.insert("posts", &posts);
        context.insert("pinned", &pinned);
        context.insert("pagination", &pagination);

        self.renderer.render("index.html", &context).map(Some)
    }

    /// Post detail page; `None` for unknown slugs and drafts
    pub fn post(&self, blog: &Blog, slug: &str) -> Result<Option<String>> {
        let Some(post) = blog.find(slug) else {
            return Ok(None);
        };

        let published = blog.published();
        let related: Vec<PostData> = blog
            .related(post, RELATED_POSTS)
            .into_iter()
            .map(|p| PostData::from_post(p, blog))
            .collect();

        let mut context = self.create_base_context(blog, &post.url_path());
        context.insert("post", &PostData::from_post(post, blog));
        context.insert("content", &post.html);
        context.insert("json_ld", &seo::post_scripts(&self.config, post));
        context.insert("prev_post", &post.prev(&published).map(NavPost::from_post));
        context.insert("next_post", &post.next(&published).map(NavPost::from_post));
        context.insert("related", &related);

        self.renderer.render("post.html", &context).map(Some)
    }

    /// Listing for one category, tag, author or series; `None` when empty.
    ///
    /// `wanted` is the URL segment, or a name when no segment matches.
    pub fn taxonomy(&self, blog: &Blog, kind: TaxonomyKind, wanted: &str) -> Result<Option<String>> {
        let Some(taxonomy) = blog.taxonomy(kind, wanted) else {
            return Ok(None);
        };
        let posts = blog.taxonomy_posts(kind, &taxonomy);
        self.listing(blog, &taxonomy.path, kind.label(), &taxonomy.name, &posts)
            .map(Some)
    }

    /// Featured posts
    pub fn pinned(&self, blog: &Blog) -> Result<String> {
        self.listing(blog, "/blog/pinned", "Featured", "Featured articles", &blog.pinned_posts())
    }

    /// Step-by-step guides
    pub fn how_to(&self, blog: &Blog) -> Result<String> {
        self.listing(blog, "/blog/how-to", "Guides", "How-to guides", &blog.how_to_posts())
    }

    /// Server-side search results page
    pub fn search(&self, blog: &Blog, filter: &PostFilter) -> Result<String> {
        let results = blog.search(filter, self.config.search_limit);
        let heading = match filter.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => format!("Results for \u{201c}{}\u{201d}", q),
            _ => "Search".to_string(),
        };
        self.listing(blog, "/blog/search", "Search", &heading, &results)
    }

    /// Year / month archive
    pub fn archive(&self, blog: &Blog) -> Result<String> {
        let mut context = self.create_base_context(blog, "/blog/archive");
        context.insert("archive", &blog.archive());
        self.renderer.render("archive.html", &context)
    }

    /// 404 page
    pub fn not_found(&self, blog: &Blog) -> Result<String> {
        let context = self.create_base_context(blog, "/404");
        self.renderer.render("not_found.html", &context)
    }

    fn listing(
        &self,
        blog: &Blog,
        path: &str,
        label: &str,
        heading: &str,
        posts: &[&Post],
    ) -> Result<String> {
        let posts: Vec<PostData> = posts.iter().map(|p| PostData::from_post(p, blog)).collect();
        let mut context = self.create_base_context(blog, path);
        context.insert("label", label);
        context.insert("heading", &escape_html(heading));
        context.insert("posts", &posts);
        self.renderer.render("listing.html", &context)
    }
}

/// Site path of an index page
pub fn pagination_path(page: usize) -> String {
    if page <= 1 {
        "/blog/".to_string()
    } else {
        format!("/blog/page/{}/", page)
    }
}
