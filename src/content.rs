//! Typed content records and the one place the upstream envelope is normalized.
//!
//! The upstream feed is loosely typed: field names change casing between
//! content kinds (`blog_Title` vs `blog_title`, `slug` vs `Slug`), ids arrive
//! as numbers or strings, and the envelope itself comes in several shapes.
//! Everything downstream of [`FeedPayload::from_upstream`] works on the typed
//! structs in this module and never looks at alternate field names again.

use serde::Serialize;
use serde_json::{Map, Value};

/// Accessors the feed utilities need, shared by every content kind.
pub trait FeedEntry {
    fn slug(&self) -> Option<&str>;
    fn category(&self) -> Option<&str>;
    fn image(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsArticle {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub inserted_at: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlogPost {
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub inserted_at: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Video {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Embeddable player URL
    pub embed_url: Option<String>,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub inserted_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryImage {
    pub id: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Gallery {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub inserted_at: Option<String>,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    News(NewsArticle),
    Blog(BlogPost),
    Video(Video),
    Gallery(Gallery),
}

impl FeedEntry for NewsArticle {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl FeedEntry for BlogPost {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl FeedEntry for Video {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
    fn category(&self) -> Option<&str> {
        None
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl FeedEntry for Gallery {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
    fn category(&self) -> Option<&str> {
        None
    }
    /// A gallery's cover is its first image
    fn image(&self) -> Option<&str> {
        self.images.iter().find_map(|img| img.file_name.as_deref())
    }
}

impl FeedEntry for ContentItem {
    fn slug(&self) -> Option<&str> {
        match self {
            ContentItem::News(n) => n.slug(),
            ContentItem::Blog(b) => b.slug(),
            ContentItem::Video(v) => v.slug(),
            ContentItem::Gallery(g) => g.slug(),
        }
    }
    fn category(&self) -> Option<&str> {
        match self {
            ContentItem::News(n) => n.category(),
            ContentItem::Blog(b) => b.category(),
            ContentItem::Video(v) => v.category(),
            ContentItem::Gallery(g) => g.category(),
        }
    }
    fn image(&self) -> Option<&str> {
        match self {
            ContentItem::News(n) => n.image(),
            ContentItem::Blog(b) => b.image(),
            ContentItem::Video(v) => v.image(),
            ContentItem::Gallery(g) => g.image(),
        }
    }
}

/// One upstream object, read leniently.
struct Record<'a>(&'a Map<String, Value>);

impl<'a> Record<'a> {
    /// First of `keys` holding a non-empty string or a number. Empty strings
    /// fall through to the next alternate name.
    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn list(&self, keys: &[&str]) -> &'a [Value] {
        keys.iter()
            .find_map(|key| self.0.get(*key)?.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

const SLUG: &[&str] = &["slug", "Slug"];
const IMAGE: &[&str] = &["image", "Image"];
const CATEGORY: &[&str] = &["categrory_Name", "category_Name", "categoryName", "category"];
const INSERTED_AT: &[&str] = &["insert_Date", "insertDate", "insert_date"];
const LANGUAGE: &[&str] = &["language", "Language"];

impl NewsArticle {
    fn from_record(r: &Record) -> Self {
        Self {
            id: r.text(&["news_Id", "newsId", "news_id", "id"]),
            title: r.text(&["news_Title", "news_title", "newsTitle", "title"]),
            content: r.text(&["news_Content", "news_content", "newsContent", "content"]),
            slug: r.text(SLUG),
            image: r.text(IMAGE),
            source: r.text(&["news_Source", "news_source", "newsSource", "source"]),
            category: r.text(CATEGORY),
            inserted_at: r.text(INSERTED_AT),
            language: r.text(LANGUAGE),
        }
    }
}

impl BlogPost {
    fn from_record(r: &Record) -> Self {
        Self {
            id: r.text(&["blog_id", "blog_Id", "blogId", "id"]),
            title: r.text(&["blog_Title", "blog_title", "blogTitle", "title"]),
            summary: r.text(&["blog_Summary", "blog_summary", "blogSummary"]),
            content: r.text(&["blog_Content", "blog_content", "blogContent"]),
            slug: r.text(SLUG),
            image: r.text(IMAGE),
            category: r.text(CATEGORY),
            inserted_at: r.text(INSERTED_AT),
            language: r.text(LANGUAGE),
        }
    }

    /// Summary when present, else the full content.
    pub fn body(&self) -> Option<&str> {
        self.summary.as_deref().or(self.content.as_deref())
    }
}

impl Video {
    fn from_record(r: &Record) -> Self {
        Self {
            id: r.text(&["videoDetail_id", "videoDetailId", "video_id", "id"]),
            title: r.text(&["videoTitle", "video_Title", "video_title", "title"]),
            embed_url: r.text(&["fileName", "file_Name", "filename"]),
            image: r.text(IMAGE),
            slug: r.text(SLUG),
            inserted_at: r.text(INSERTED_AT),
        }
    }
}

impl Gallery {
    fn from_record(r: &Record) -> Self {
        let images = r
            .list(&["gallerDetailList", "galleryDetailList", "gallery_Detail_List"])
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                let img = Record(obj);
                GalleryImage {
                    id: img.text(&["gallery_Detail_id", "galleryDetailId", "id"]),
                    file_name: img.text(&["fileName", "file_Name", "filename"]),
                }
            })
            .collect();

        Self {
            id: r.text(&["galleryMaster_id", "galleryMasterId", "id"]),
            title: r.text(&["galleryMaster_Title", "galleryMasterTitle", "title"]),
            slug: r.text(SLUG),
            inserted_at: r.text(INSERTED_AT),
            images,
        }
    }
}

/// The canonical in-memory shape of one upstream response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPayload {
    pub news: Vec<NewsArticle>,
    pub blogs: Vec<BlogPost>,
    pub videos: Vec<Video>,
    pub galleries: Vec<Gallery>,
}

const SECTIONS: [&str; 4] = ["news", "blogs", "videos", "galleries"];

impl FeedPayload {
    /// Normalize an upstream response body. Rules, first match wins:
    ///
    /// 1. an object whose `data` is an object: sections are read from `data`;
    /// 2. an object with any of `news`, `blogs`, `videos`, `galleries` at the
    ///    top level: sections are read from there;
    /// 3. a bare array: it is the news section;
    /// 4. anything else: the empty payload.
    ///
    /// A section that is present but not an array is treated as empty, and
    /// array elements that are not objects are skipped.
    pub fn from_upstream(value: &Value) -> Self {
        match value {
            Value::Object(root) => {
                if let Some(data) = root.get("data").and_then(Value::as_object) {
                    Self::from_sections(data)
                } else if SECTIONS.iter().any(|s| root.contains_key(*s)) {
                    Self::from_sections(root)
                } else {
                    Self::default()
                }
            }
            Value::Array(items) => Self {
                news: records(items).map(|r| NewsArticle::from_record(&r)).collect(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    fn from_sections(container: &Map<String, Value>) -> Self {
        let section = |key: &str| {
            container
                .get(key)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        };

        Self {
            news: records(section("news"))
                .map(|r| NewsArticle::from_record(&r))
                .collect(),
            blogs: records(section("blogs"))
                .map(|r| BlogPost::from_record(&r))
                .collect(),
            videos: records(section("videos"))
                .map(|r| Video::from_record(&r))
                .collect(),
            galleries: records(section("galleries"))
                .map(|r| Gallery::from_record(&r))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.news.is_empty()
            && self.blogs.is_empty()
            && self.videos.is_empty()
            && self.galleries.is_empty()
    }

    /// Every record wrapped in its [`ContentItem`] variant, section by section.
    pub fn tagged(&self) -> TaggedFeed {
        TaggedFeed {
            news: self.news.iter().cloned().map(ContentItem::News).collect(),
            blogs: self.blogs.iter().cloned().map(ContentItem::Blog).collect(),
            videos: self.videos.iter().cloned().map(ContentItem::Video).collect(),
            galleries: self
                .galleries
                .iter()
                .cloned()
                .map(ContentItem::Gallery)
                .collect(),
        }
    }
}

/// Serialized form of [`FeedPayload`]; each element carries a `kind` tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaggedFeed {
    pub news: Vec<ContentItem>,
    pub blogs: Vec<ContentItem>,
    pub videos: Vec<ContentItem>,
    pub galleries: Vec<ContentItem>,
}

fn records(values: &[Value]) -> impl Iterator<Item = Record<'_>> {
    values.iter().filter_map(Value::as_object).map(Record)
}
