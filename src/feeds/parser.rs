// src/feeds/parser.rs
//
// Raw XML -> RawItem list. RSS 2.0 with the usual WordPress-era namespaced
// extensions (dc:, content:, media:, atom:). Anything else (Atom documents,
// malformed XML) degrades to "no items".

use quick_xml::de::from_str;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Default, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    item: Vec<RawItem>,
}

/// One feed entry as the XML dialect delivered it. Field shape varies by
/// feed; every candidate the normalizer probes is captured here. Repeated
/// media refs collect into a Vec, a single bare element yields one entry.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    #[serde(rename = "dc:date")]
    pub dc_date: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    #[serde(rename = "atom:updated")]
    pub atom_updated: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "content:encoded")]
    pub content_encoded: Option<String>,
    pub summary: Option<String>,
    pub enclosure: Option<MediaRef>,
    #[serde(default, rename = "media:content")]
    pub media_content: Vec<MediaRef>,
    #[serde(default, rename = "media:thumbnail")]
    pub media_thumbnail: Vec<MediaRef>,
}

/// `<enclosure>` / `<media:content>` / `<media:thumbnail>` reference.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRef {
    #[serde(rename = "@url")]
    pub url: Option<String>,
    #[serde(rename = "@type")]
    pub mime: Option<String>,
}

impl RawItem {
    /// Publication date candidates, most authoritative first.
    pub fn date_candidates(&self) -> [Option<&str>; 5] {
        [
            self.pub_date.as_deref(),
            self.dc_date.as_deref(),
            self.date.as_deref(),
            self.updated.as_deref(),
            self.atom_updated.as_deref(),
        ]
    }

    /// Body/description candidates, richest first.
    pub fn body_candidates(&self) -> [Option<&str>; 3] {
        [
            self.content_encoded.as_deref(),
            self.description.as_deref(),
            self.summary.as_deref(),
        ]
    }
}

/// Parse a feed document into its raw items.
///
/// Tries `rss > channel > item` first, then a bare `channel` root. A feed
/// where neither path yields items is treated as empty, not as an error.
pub fn parse_feed(xml: &str, feed_url: &str) -> Vec<RawItem> {
    let xml_clean = scrub_html_entities_for_xml(xml);

    let items = match from_str::<Rss>(&xml_clean) {
        Ok(rss) => rss.channel.item,
        Err(_) => from_str::<Channel>(&xml_clean)
            .map(|ch| ch.item)
            .unwrap_or_default(),
    };

    if items.is_empty() {
        tracing::warn!(feed = feed_url, "no items in feed");
    }
    items
}

// WordPress feeds routinely embed HTML entities that are undefined in XML;
// quick-xml chokes on them unless they are substituted up front.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
