//! Feed utilities: pure functions that shape fetched records into page views.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::content::FeedEntry;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;
pub const ELLIPSIS: &str = "...";
pub const GENERIC_PLACEHOLDER: &str = "/images/placeholder-news.jpg";

const CATEGORY_PLACEHOLDERS: &[(&str, &str)] = &[
    ("business", "/images/placeholder-business.jpg"),
    ("technology", "/images/placeholder-tech.jpg"),
    ("sports", "/images/placeholder-sports.jpg"),
    ("entertainment", "/images/placeholder-entertainment.jpg"),
    ("health", "/images/placeholder-health.jpg"),
    ("science", "/images/placeholder-science.jpg"),
    ("general", GENERIC_PLACEHOLDER),
];

/// Lowercase `name`, collapse every run of characters outside `[a-z0-9]`
/// into one `-`, and trim dashes from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Reverse-map a category slug to the display name of the first item whose
/// category slugifies to it. Unknown slugs come back unchanged.
pub fn category_from_slug<T: FeedEntry>(items: &[T], category_slug: &str) -> String {
    items
        .iter()
        .filter_map(T::category)
        .find(|name| slugify(name) == category_slug)
        .filter(|name| !name.is_empty())
        .unwrap_or(category_slug)
        .to_string()
}

/// Distinct trimmed, non-blank category names in lexicographic order.
pub fn extract_categories<T: FeedEntry>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .filter_map(T::category)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn find_by_slug<'a, T: FeedEntry>(items: &'a [T], slug: &str) -> Option<&'a T> {
    items.iter().find(|item| item.slug() == Some(slug))
}

pub fn filter_by_category<'a, T: FeedEntry>(items: &'a [T], category_slug: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| slugify(item.category().unwrap_or_default()) == category_slug)
        .collect()
}

/// One page of a larger slice, 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    pub current_page: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slice out page `page` of `items`. A page past the end (or page 0) gets an
/// empty slice but still reports the real totals; the page number is never
/// clamped. A `page_size` of 0 is treated as 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let slice = match page.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(page_size).min(total_items);
            let end = start.saturating_add(page_size).min(total_items);
            &items[start..end]
        }
        None => &items[..0],
    };

    Page {
        items: slice,
        total_pages,
        current_page: page,
        total_items,
        has_next: page < total_pages,
        has_previous: page > 1,
    }
}

/// Remove anything between `<` and `>`.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Plain-text preview of `html` at most `max_length` characters long plus
/// the ellipsis. Prefers to cut at the last space when that space sits in the
/// final 30% of the cut.
pub fn excerpt(html: &str, max_length: usize) -> String {
    let text = strip_html(html);
    let text = text.trim();

    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_length).collect();
    let boundary = truncated.rfind(' ').filter(|&byte_idx| {
        let char_pos = truncated[..byte_idx].chars().count();
        char_pos as f64 >= max_length as f64 * 0.7
    });

    match boundary {
        Some(byte_idx) => format!("{}{}", &truncated[..byte_idx], ELLIPSIS),
        None => format!("{}{}", truncated, ELLIPSIS),
    }
}

/// Parse the timestamp shapes the feed is known to send. Offsets are
/// honoured; timestamps without one are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `"Mar 5, 2024"`, or the input unchanged when it is not a date.
pub fn format_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => input.to_string(),
    }
}

pub fn time_ago(input: &str) -> String {
    time_ago_at(input, Utc::now())
}

/// Relative label for `input` as seen from `now`. Anything a week or older,
/// or unparseable, goes through [`format_date`].
pub fn time_ago_at(input: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(input) else {
        return format_date(input);
    };

    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    format_date(input)
}

/// The item's own image, or a placeholder chosen by category.
pub fn resolve_image<T: FeedEntry + ?Sized>(item: &T) -> String {
    if let Some(image) = item.image().filter(|img| !img.trim().is_empty()) {
        return image.to_string();
    }

    let category = item
        .category()
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "general".to_string());

    CATEGORY_PLACEHOLDERS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, path)| *path)
        .unwrap_or(GENERIC_PLACEHOLDER)
        .to_string()
}
