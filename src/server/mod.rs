//! HTTP server: blog pages, feeds, search API and lead capture
//!
//! Every request reads the content directory again on the blocking pool,
//! so edits show up without a restart.

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::ContentError;
use crate::feed;
use crate::generator::PageBuilder;
use crate::lead::{self, LeadRequest, LeadResponse};
use crate::query::{PostFilter, SearchEntry, TaxonomyKind};
use crate::{Blog, Site};

/// Server state
struct ServerState {
    site: Site,
    pages: PageBuilder,
}

type SharedState = Arc<ServerState>;

/// Failures that end a request with a 500
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Render(#[from] anyhow::Error),
    #[error("content task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// `/api/search` payload
#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub results: Vec<SearchEntry<'a>>,
    pub count: usize,
}

/// Run a search and shape it for the API
pub fn search_response<'a>(
    blog: &'a Blog,
    filter: &PostFilter,
    limit: usize,
) -> SearchResponse<'a> {
    let results: Vec<SearchEntry> = blog
        .search(filter, limit)
        .into_iter()
        .map(SearchEntry::from_post)
        .collect();
    SearchResponse {
        count: results.len(),
        results,
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    if !site.content_dir.is_dir() {
        tracing::warn!(
            "Content directory {:?} does not exist; blog pages will fail",
            site.content_dir
        );
    }

    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}/blog", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        pages: PageBuilder::new(&site.config)?,
    });
    let static_files = ServeDir::new(&site.public_dir).append_index_html_on_directories(true);

    Ok(Router::new()
        .route("/blog", get(blog_index))
        .route("/blog/", get(blog_index))
        .route("/blog/page/:page", get(blog_page))
        .route("/blog/page/:page/", get(blog_page))
        .route("/blog/search", get(search_page))
        .route("/blog/archive", get(archive_page))
        .route("/blog/pinned", get(pinned_page))
        .route("/blog/how-to", get(how_to_page))
        .route("/blog/category/:name", get(category_page))
        .route("/blog/tag/:name", get(tag_page))
        .route("/blog/author/:name", get(author_page))
        .route("/blog/series/:name", get(series_page))
        .route("/blog/:slug", get(post_page))
        .route("/api/search", get(api_search))
        .route("/api/contact", post(api_contact))
        .route("/rss.xml", get(rss))
        .route("/atom.xml", get(atom))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Read the collection on the blocking pool
async fn load_blog(state: &ServerState) -> Result<Blog, ServerError> {
    let site = state.site.clone();
    Ok(tokio::task::spawn_blocking(move || Blog::load(&site)).await??)
}

/// Wrap rendered HTML, answering 404 when there is nothing to show
fn html_page(state: &ServerState, blog: &Blog, html: Option<String>) -> Result<Response, ServerError> {
    match html {
        Some(html) => Ok(Html(html).into_response()),
        None => Ok((StatusCode::NOT_FOUND, Html(state.pages.not_found(blog)?)).into_response()),
    }
}

async fn blog_index(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ServerError> {
    // Unparseable page numbers fall back to the first page
    let page = query
        .page
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(1);
    index(&state, page).await
}

async fn blog_page(
    State(state): State<SharedState>,
    Path(page): Path<String>,
) -> Result<Response, ServerError> {
    match page.parse::<usize>() {
        Ok(page) => index(&state, page).await,
        Err(_) => {
            let blog = load_blog(&state).await?;
            html_page(&state, &blog, None)
        }
    }
}

async fn index(state: &ServerState, page: usize) -> Result<Response, ServerError> {
    let blog = load_blog(state).await?;
    let html = state.pages.index(&blog, page)?;
    html_page(state, &blog, html)
}

async fn post_page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let html = state.pages.post(&blog, &slug)?;
    html_page(&state, &blog, html)
}

async fn taxonomy_page(
    state: &ServerState,
    kind: TaxonomyKind,
    name: &str,
) -> Result<Response, ServerError> {
    let blog = load_blog(state).await?;
    let html = state.pages.taxonomy(&blog, kind, name)?;
    html_page(state, &blog, html)
}

async fn category_page(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    taxonomy_page(&state, TaxonomyKind::Category, &name).await
}

async fn tag_page(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    taxonomy_page(&state, TaxonomyKind::Tag, &name).await
}

async fn author_page(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    taxonomy_page(&state, TaxonomyKind::Author, &name).await
}

async fn series_page(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    taxonomy_page(&state, TaxonomyKind::Series, &name).await
}

async fn archive_page(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let html = state.pages.archive(&blog)?;
    html_page(&state, &blog, Some(html))
}

async fn pinned_page(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let html = state.pages.pinned(&blog)?;
    html_page(&state, &blog, Some(html))
}

async fn how_to_page(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let html = state.pages.how_to(&blog)?;
    html_page(&state, &blog, Some(html))
}

async fn search_page(
    State(state): State<SharedState>,
    Query(filter): Query<PostFilter>,
) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let html = state.pages.search(&blog, &filter)?;
    html_page(&state, &blog, Some(html))
}

async fn api_search(
    State(state): State<SharedState>,
    Query(filter): Query<PostFilter>,
) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    let response = search_response(&blog, &filter, state.site.config.search_limit);
    Ok(Json(response).into_response())
}

async fn api_contact(
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> (StatusCode, Json<LeadResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected contact body: {}", rejection.body_text());
            let reason = format!("Invalid request body: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(LeadResponse::rejected(&[reason])));
        }
    };
    let response = lead::submit(&request);
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(response))
}

fn xml(content_type: &'static str, body: String) -> Response {
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn rss(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    Ok(xml(
        "application/rss+xml; charset=utf-8",
        feed::build_rss(&state.site.config, &blog),
    ))
}

async fn atom(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    Ok(xml(
        "application/atom+xml; charset=utf-8",
        feed::build_atom(&state.site.config, &blog),
    ))
}

async fn sitemap(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let blog = load_blog(&state).await?;
    Ok(xml(
        "application/xml; charset=utf-8",
        feed::build_sitemap(&state.site.config, &blog),
    ))
}

async fn robots(State(state): State<SharedState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        feed::build_robots(&state.site.config),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            url: "https://academy.example".into(),
            ..Default::default()
        };
        let site = Site::with_config(tmp.path(), config);
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("intro-python.md"),
            "---\ntitle: Intro to Python\ndate: 2024-01-10\ncategory: Python\nkeywords: beginner, data\n---\n\nHello.\n",
        )
        .unwrap();
        fs::write(
            site.content_dir.join("js-async.md"),
            "---\ntitle: Async JavaScript\ndate: 2024-02-10\ncategory: JavaScript\n---\n\nPromises.\n",
        )
        .unwrap();
        fs::write(
            site.content_dir.join("wip.md"),
            "---\ntitle: Work in progress\ndate: 2024-03-10\ndraft: true\n---\n\nSoon.\n",
        )
        .unwrap();
        (tmp, site)
    }

    async fn get(site: &Site, uri: &str) -> (StatusCode, String) {
        let response = router(site)
            .unwrap()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    async fn contact(site: &Site, json: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        let response = router(site).unwrap().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_search_response_counts() {
        let blog = Blog::default();
        let response = search_response(&blog, &PostFilter::query("rust"), 25);
        assert_eq!(response.count, 0);
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_blog_index_and_post() {
        let (_tmp, site) = site();
        let (status, body) = get(&site, "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Intro to Python"));
        assert!(!body.contains("Work in progress"));

        let (status, body) = get(&site, "/blog/intro-python").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("application/ld+json"));

        let (status, _) = get(&site, "/blog/?page=oops").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_pages_are_404() {
        let (_tmp, site) = site();
        assert_eq!(get(&site, "/blog/wip").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&site, "/blog/no-such-post").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&site, "/blog/page/9").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&site, "/blog/tag/rust").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_taxonomy_routes() {
        let (_tmp, site) = site();
        let (status, body) = get(&site, "/blog/category/python").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Intro to Python"));
        assert!(!body.contains("Async JavaScript"));

        let (status, _) = get(&site, "/blog/tag/Beginner").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_search() {
        let (_tmp, site) = site();
        let (status, body) = get(&site, "/api/search?q=promises").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        // the description falls back to the body text "Promises."
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["slug"], "js-async");
        assert_eq!(value["results"][0]["url"], "/blog/js-async");
        assert_eq!(value["results"][0]["date"], "2024-02-10T00:00:00Z");
        assert_eq!(value["results"][0]["readingTime"], 1);
        assert!(value["results"][0].get("lastModified").is_some());

        let (_, body) = get(&site, "/api/search?category=javascript").await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["slug"], "js-async");
    }

    #[tokio::test]
    async fn test_feeds_and_robots() {
        let (_tmp, site) = site();
        let (status, body) = get(&site, "/rss.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("https://academy.example/blog/js-async"));
        assert!(!body.contains("/blog/wip"));

        let (_, body) = get(&site, "/sitemap.xml").await;
        assert!(body.contains("<loc>https://academy.example/blog/intro-python</loc>"));

        let (_, body) = get(&site, "/robots.txt").await;
        assert!(body.contains("Sitemap: https://academy.example/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_contact() {
        let (_tmp, site) = site();
        let (status, body) = contact(&site, r#"{"name":"Sam","email":"sam@example.com"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = contact(&site, r#"{"name":"","email":"nope"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_contact_malformed_body_keeps_response_shape() {
        let (_tmp, site) = site();
        for json in [r#"{"name":"Sam","#, "not json", r#"{"name":42}"#] {
            let (status, body) = contact(&site, json).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", json);
            assert_eq!(body["success"], false);
            assert!(body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body"));
        }
    }

    #[tokio::test]
    async fn test_missing_content_dir_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        let (status, _) = get(&site, "/blog").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
