// src/feeds/normalize.rs
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::config::Source;
use crate::feeds::parser::{MediaRef, RawItem};

/// Normalized, pipeline-internal representation of one feed entry.
///
/// `title` and `link` are always non-empty; `date` is always a valid
/// timestamp (processing time when the feed gave none). `description` and
/// `image` are populated only on the single-item path via [`with_media`].
///
/// [`with_media`]: CanonicalItem::with_media
#[derive(Debug, Clone)]
pub struct CanonicalItem {
    pub title: String,
    pub link: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub source: Source,
}

/// Map a raw item to its canonical form, or reject it.
/// Items without a usable title or link are dropped here.
pub fn canonicalize(raw: &RawItem, source: &Source, now: DateTime<Utc>) -> Option<CanonicalItem> {
    let title = nonempty(raw.title.as_deref())?;
    let link = nonempty(raw.link.as_deref())?;

    Some(CanonicalItem {
        title: title.to_string(),
        link: link.to_string(),
        date: resolve_date(raw, now),
        description: None,
        image: None,
        source: source.clone(),
    })
}

impl CanonicalItem {
    /// Enrich with description and image (single-item endpoint only).
    pub fn with_media(mut self, raw: &RawItem) -> Self {
        let body = raw.body_candidates().into_iter().flatten().next();
        self.image = resolve_image(raw, body);
        self.description = body.map(strip_html).filter(|d| !d.is_empty());
        self
    }
}

fn nonempty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the publication date: parse the first candidate the feed
/// provided; an absent or unparsable value resolves to `now` so every
/// surviving item carries a usable sort key.
pub fn resolve_date(raw: &RawItem, now: DateTime<Utc>) -> DateTime<Utc> {
    match raw.date_candidates().into_iter().flatten().next() {
        Some(s) => parse_feed_date(s).unwrap_or(now),
        None => now,
    }
}

/// RSS dialects ship RFC 2822 (`pubDate`) or RFC 3339 (`dc:date`,
/// `updated`) timestamps; try both.
fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn is_image(mime: Option<&str>) -> bool {
    mime.map_or(true, |m| m.starts_with("image/"))
}

fn media_url(m: &MediaRef) -> Option<&str> {
    if is_image(m.mime.as_deref()) {
        m.url.as_deref().filter(|u| !u.is_empty())
    } else {
        None
    }
}

/// Pick an image for the item, first match wins:
/// enclosure, then media:content / media:thumbnail, then the first
/// `<img src="...">` inside the raw body HTML.
pub fn resolve_image(raw: &RawItem, body_html: Option<&str>) -> Option<String> {
    if let Some(url) = raw.enclosure.as_ref().and_then(media_url) {
        return Some(url.to_string());
    }

    if let Some(url) = raw
        .media_content
        .iter()
        .chain(raw.media_thumbnail.iter())
        .find_map(media_url)
    {
        return Some(url.to_string());
    }

    let html = body_html?;
    static RE_IMG: OnceCell<Regex> = OnceCell::new();
    let re = RE_IMG.get_or_init(|| Regex::new(r#"(?is)<img[^>]+src="([^"]+)""#).unwrap());
    re.captures(html).map(|c| c[1].to_string())
}

/// Strip markup down to plain text: decode HTML entities, drop tags,
/// collapse whitespace.
pub fn strip_html(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}
