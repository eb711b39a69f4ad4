//! Template structs and the view models they render.
//!
//! Everything here is built from already-fetched content; the feed utilities
//! do the shaping so templates only print strings and loop.

use askama::Template;

use crate::content::{BlogPost, Gallery, NewsArticle, Video};
use crate::utils::{self, Page};

const SIDE_EXCERPT_LENGTH: usize = 100;
const BLOG_EXCERPT_LENGTH: usize = 140;

pub struct NavCategory {
    pub name: String,
    pub slug: String,
}

impl NavCategory {
    pub fn from_names(names: Vec<String>) -> Vec<Self> {
        names
            .into_iter()
            .map(|name| NavCategory {
                slug: utils::slugify(&name),
                name,
            })
            .collect()
    }

    pub fn href(&self) -> String {
        format!("/category/{}", self.slug)
    }
}

pub struct ArticleCard {
    pub title: String,
    pub href: String,
    pub image: String,
    pub excerpt: String,
    pub category: String,
    pub category_href: String,
    pub source: String,
    pub published: String,
    pub time_ago: String,
}

impl ArticleCard {
    pub fn from_news(article: &NewsArticle, excerpt_length: usize) -> Self {
        let inserted_at = article.inserted_at.as_deref().unwrap_or_default();
        let category = article.category.clone().unwrap_or_default();

        Self {
            title: article.title.clone().unwrap_or_default(),
            href: detail_href("/news", article.slug.as_deref()),
            image: utils::resolve_image(article),
            excerpt: utils::excerpt(
                article.content.as_deref().unwrap_or_default(),
                excerpt_length,
            ),
            category_href: format!("/category/{}", utils::slugify(&category)),
            category,
            source: article.source.clone().unwrap_or_default(),
            published: utils::format_date(inserted_at),
            time_ago: utils::time_ago(inserted_at),
        }
    }

    pub fn side(article: &NewsArticle) -> Self {
        Self::from_news(article, SIDE_EXCERPT_LENGTH)
    }
}

pub struct ArticleView {
    pub title: String,
    pub body_html: String,
    pub image: String,
    pub source: String,
    pub category: String,
    pub category_href: String,
    pub language: String,
    pub published: String,
}

impl ArticleView {
    pub fn from_news(article: &NewsArticle) -> Self {
        let category = article.category.clone().unwrap_or_default();
        Self {
            title: article.title.clone().unwrap_or_default(),
            body_html: article.content.clone().unwrap_or_default(),
            image: utils::resolve_image(article),
            source: article.source.clone().unwrap_or_default(),
            category_href: format!("/category/{}", utils::slugify(&category)),
            category,
            language: article.language.clone().unwrap_or_default(),
            published: utils::format_date(article.inserted_at.as_deref().unwrap_or_default()),
        }
    }
}

pub struct BlogCard {
    pub title: String,
    pub href: String,
    pub image: String,
    pub excerpt: String,
    pub language: String,
    pub published: String,
}

impl BlogCard {
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone().unwrap_or_default(),
            href: detail_href("/blog", post.slug.as_deref()),
            image: utils::resolve_image(post),
            excerpt: utils::excerpt(post.body().unwrap_or_default(), BLOG_EXCERPT_LENGTH),
            language: post.language.clone().unwrap_or_default(),
            published: utils::format_date(post.inserted_at.as_deref().unwrap_or_default()),
        }
    }
}

pub struct BlogView {
    pub title: String,
    pub summary_html: String,
    pub content_html: String,
    pub image: String,
    pub language: String,
    pub published: String,
}

impl BlogView {
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone().unwrap_or_default(),
            summary_html: post.summary.clone().unwrap_or_default(),
            content_html: post.content.clone().unwrap_or_default(),
            image: utils::resolve_image(post),
            language: post
                .language
                .clone()
                .unwrap_or_else(|| "English".to_string()),
            published: utils::format_date(post.inserted_at.as_deref().unwrap_or_default()),
        }
    }
}

pub struct VideoCard {
    pub title: String,
    /// Empty when the video has no embeddable URL
    pub embed_url: String,
    pub image: String,
    pub published: String,
}

impl VideoCard {
    pub fn from_video(video: &Video) -> Self {
        Self {
            title: video.title.clone().unwrap_or_default(),
            embed_url: video.embed_url.clone().unwrap_or_default(),
            image: utils::resolve_image(video),
            published: utils::format_date(video.inserted_at.as_deref().unwrap_or_default()),
        }
    }

    pub fn has_embed(&self) -> bool {
        !self.embed_url.is_empty()
    }
}

pub struct GalleryView {
    pub title: String,
    pub published: String,
    pub images: Vec<String>,
}

impl GalleryView {
    pub fn from_gallery(gallery: &Gallery) -> Self {
        Self {
            title: gallery.title.clone().unwrap_or_default(),
            published: utils::format_date(gallery.inserted_at.as_deref().unwrap_or_default()),
            images: gallery
                .images
                .iter()
                .filter_map(|img| img.file_name.clone())
                .collect(),
        }
    }
}

pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Links for a paginated listing rooted at `base` (`/blog`, `/category/x`).
pub struct Pager {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_href: String,
    pub next_href: String,
    pub first_href: String,
    pub last_href: String,
    pub links: Vec<PageLink>,
}

impl Pager {
    pub fn new<T>(base: &str, page: &Page<'_, T>) -> Self {
        let href = |n: usize| format!("{}?page={}", base, n);

        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            has_previous: page.has_previous,
            has_next: page.has_next,
            previous_href: href(page.current_page.saturating_sub(1).max(1)),
            next_href: href(page.current_page.saturating_add(1)),
            first_href: href(1),
            last_href: href(page.total_pages.max(1)),
            links: (1..=page.total_pages)
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    current: number == page.current_page,
                })
                .collect(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

fn detail_href(prefix: &str, slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!("{}/{}", prefix, slug),
        None => prefix.to_string(),
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: Vec<NavCategory>,
    pub hero: Vec<ArticleCard>,
    pub headlines: Vec<ArticleCard>,
    pub featured: Option<ArticleCard>,
    pub side: Vec<ArticleCard>,
    pub tech: Vec<ArticleCard>,
}

#[derive(Template)]
#[template(path = "news_detail.html")]
pub struct NewsDetailTemplate {
    pub categories: Vec<NavCategory>,
    pub article: ArticleView,
    pub related: Vec<ArticleCard>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub categories: Vec<NavCategory>,
    pub name: String,
    pub cards: Vec<ArticleCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogListTemplate {
    pub categories: Vec<NavCategory>,
    pub cards: Vec<BlogCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "blog_detail.html")]
pub struct BlogDetailTemplate {
    pub categories: Vec<NavCategory>,
    pub post: BlogView,
    pub related: Vec<BlogCard>,
    pub popular: Vec<BlogCard>,
}

#[derive(Template)]
#[template(path = "video.html")]
pub struct VideoListTemplate {
    pub categories: Vec<NavCategory>,
    pub videos: Vec<VideoCard>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryListTemplate {
    pub categories: Vec<NavCategory>,
    pub galleries: Vec<GalleryView>,
    pub pager: Pager,
}
