use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::{BlogPost, FeedPayload, NewsArticle};
use crate::error::AppError;
use crate::upstream::Upstream;
use crate::utils;
use crate::views::{
    ArticleCard, ArticleView, BlogCard, BlogDetailTemplate, BlogListTemplate, BlogView,
    CategoryTemplate, GalleryListTemplate, GalleryView, IndexTemplate, NavCategory,
    NewsDetailTemplate, Pager, VideoCard, VideoListTemplate,
};

const HERO_SLIDES: usize = 5;
const FEATURED_SIDE_ARTICLES: usize = 4;
const TECH_ARTICLES: usize = 3;
const TECH_FALLBACK_ARTICLES: usize = 4;
const SECONDARY_HEADLINES: usize = 3;
const RELATED_ITEMS: usize = 4;
const POPULAR_POSTS: usize = 5;

pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub items_per_page: usize,
    pub gallery_items_per_page: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/news/:slug", get(news_detail))
        .route("/category/:slug", get(category))
        .route("/blog", get(blog_list))
        .route("/blog/:slug", get(blog_detail))
        .route("/video", get(video_list))
        .route("/gallery", get(gallery_list))
        .route("/api/news", get(proxy_news))
        .route("/api/feed", get(normalized_feed))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/images", ServeDir::new("static/images"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppError::from(err).into_response(),
        }
    }
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

fn nav_categories(feed: &FeedPayload) -> Vec<NavCategory> {
    NavCategory::from_names(utils::extract_categories(&feed.news))
}

fn is_tech(article: &NewsArticle) -> bool {
    article
        .category
        .as_deref()
        .map(|c| c.to_lowercase().contains("tech"))
        .unwrap_or(false)
}

/// Other posts, newest first. Undated posts sink to the end and otherwise
/// keep their feed order.
fn popular_posts<'a>(blogs: &'a [BlogPost], exclude_slug: &str) -> Vec<&'a BlogPost> {
    let mut dated: Vec<(Option<DateTime<Utc>>, &BlogPost)> = blogs
        .iter()
        .filter(|post| post.slug.as_deref() != Some(exclude_slug))
        .map(|post| {
            let inserted = post.inserted_at.as_deref().and_then(utils::parse_timestamp);
            (inserted, post)
        })
        .collect();

    // None orders below Some, so a descending sort leaves undated posts last
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().take(POPULAR_POSTS).map(|(_, post)| post).collect()
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let feed = state.upstream.load_feed().await;

    let hero = feed
        .news
        .iter()
        .take(HERO_SLIDES)
        .map(ArticleCard::side)
        .collect();
    let headlines = feed
        .news
        .iter()
        .take(HERO_SLIDES)
        .skip(1)
        .take(SECONDARY_HEADLINES)
        .map(ArticleCard::side)
        .collect();

    let featured = feed
        .news
        .first()
        .map(|a| ArticleCard::from_news(a, utils::DEFAULT_EXCERPT_LENGTH));
    let side = feed
        .news
        .iter()
        .skip(1)
        .take(FEATURED_SIDE_ARTICLES)
        .map(ArticleCard::side)
        .collect();

    let mut tech: Vec<ArticleCard> = feed
        .news
        .iter()
        .filter(|a| is_tech(a))
        .take(TECH_ARTICLES)
        .map(ArticleCard::side)
        .collect();
    if tech.is_empty() {
        tech = feed
            .news
            .iter()
            .take(TECH_FALLBACK_ARTICLES)
            .map(ArticleCard::side)
            .collect();
    }

    HtmlTemplate(IndexTemplate {
        categories: nav_categories(&feed),
        hero,
        headlines,
        featured,
        side,
        tech,
    })
}

pub async fn news_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let feed = state.upstream.load_feed().await;

    let article = utils::find_by_slug(&feed.news, &slug)
        .ok_or_else(|| AppError::NotFound("Article".to_string()))?;

    let category_slug = utils::slugify(article.category.as_deref().unwrap_or_default());
    let related = utils::filter_by_category(&feed.news, &category_slug)
        .into_iter()
        .filter(|other| other.slug.as_deref() != Some(slug.as_str()))
        .take(RELATED_ITEMS)
        .map(ArticleCard::side)
        .collect();

    Ok(HtmlTemplate(NewsDetailTemplate {
        categories: nav_categories(&feed),
        article: ArticleView::from_news(article),
        related,
    }))
}

pub async fn category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let feed = state.upstream.load_feed().await;

    let matching = utils::filter_by_category(&feed.news, &slug);
    let page = utils::paginate(&matching, query.page, state.items_per_page);

    HtmlTemplate(CategoryTemplate {
        categories: nav_categories(&feed),
        name: utils::category_from_slug(&feed.news, &slug),
        cards: page
            .items
            .iter()
            .map(|a| ArticleCard::from_news(a, utils::DEFAULT_EXCERPT_LENGTH))
            .collect(),
        pager: Pager::new(&format!("/category/{}", slug), &page),
    })
}

pub async fn blog_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let feed = state.upstream.load_feed().await;
    let page = utils::paginate(&feed.blogs, query.page, state.items_per_page);

    HtmlTemplate(BlogListTemplate {
        categories: nav_categories(&feed),
        cards: page.items.iter().map(BlogCard::from_post).collect(),
        pager: Pager::new("/blog", &page),
    })
}

pub async fn blog_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let feed = state.upstream.load_feed().await;

    let post = utils::find_by_slug(&feed.blogs, &slug)
        .ok_or_else(|| AppError::NotFound("Blog post".to_string()))?;

    let related = feed
        .blogs
        .iter()
        .filter(|other| other.slug.as_deref() != Some(slug.as_str()))
        .take(RELATED_ITEMS)
        .map(BlogCard::from_post)
        .collect();
    let popular = popular_posts(&feed.blogs, &slug)
        .into_iter()
        .map(BlogCard::from_post)
        .collect();

    Ok(HtmlTemplate(BlogDetailTemplate {
        categories: nav_categories(&feed),
        post: BlogView::from_post(post),
        related,
        popular,
    }))
}

pub async fn video_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let feed = state.upstream.load_feed().await;
    let page = utils::paginate(&feed.videos, query.page, state.items_per_page);

    HtmlTemplate(VideoListTemplate {
        categories: nav_categories(&feed),
        videos: page.items.iter().map(VideoCard::from_video).collect(),
        pager: Pager::new("/video", &page),
    })
}

pub async fn gallery_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let feed = state.upstream.load_feed().await;
    let page = utils::paginate(&feed.galleries, query.page, state.gallery_items_per_page);

    HtmlTemplate(GalleryListTemplate {
        categories: nav_categories(&feed),
        galleries: page.items.iter().map(GalleryView::from_gallery).collect(),
        pager: Pager::new("/gallery", &page),
    })
}

/// Forward to the upstream feed and relay its JSON untouched.
pub async fn proxy_news(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.upstream.fetch_raw().await?;
    Ok(([(CONTENT_TYPE, "application/json")], body))
}

/// The normalized payload with a `kind` tag on every record.
pub async fn normalized_feed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.upstream.load_feed().await.tagged())
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
