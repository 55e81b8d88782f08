// src/feeds/mod.rs
pub mod fetcher;
pub mod normalize;
pub mod parser;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;

use crate::config::Source;
use crate::feeds::normalize::{canonicalize, CanonicalItem};

/// Each source contributes at most this many items per cycle.
pub const PER_SOURCE_LIMIT: usize = 5;
/// The digest takes the freshest items across all sources, capped here.
pub const DIGEST_LIMIT: usize = 6;

/// How much of each item the normalizer materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// Title/link/date only (digest endpoint).
    Headline,
    /// Plus description snippet and image (single-item endpoint).
    Full,
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feeds_fetch_errors_total", "Feed fetch/transport errors.");
        describe_counter!("feeds_items_total", "Raw items parsed from feeds.");
        describe_counter!(
            "feeds_kept_total",
            "Items kept after normalization + filtering."
        );
        describe_histogram!("feeds_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "feeds_last_run_ts",
            "Unix ts when the feed pipeline last ran."
        );
    });
}

/// Fetch + parse + normalize one source. Failures at any stage collapse to
/// an empty contribution; nothing escapes this boundary.
pub async fn source_items(
    client: &reqwest::Client,
    source: &Source,
    detail: Detail,
    now: DateTime<Utc>,
) -> Vec<CanonicalItem> {
    let Some(xml) = fetcher::fetch_feed(client, source).await else {
        return Vec::new();
    };

    let t0 = std::time::Instant::now();
    let raw_items = parser::parse_feed(&xml, &source.url);
    histogram!("feeds_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("feeds_items_total").increment(raw_items.len() as u64);

    raw_items
        .iter()
        .filter_map(|raw| {
            canonicalize(raw, source, now).map(|item| match detail {
                Detail::Full => item.with_media(raw),
                Detail::Headline => item,
            })
        })
        .take(PER_SOURCE_LIMIT)
        .collect()
}

/// Fan out over all configured sources concurrently, join, and merge.
/// Source order is preserved in the merge, which keeps the later sort's
/// tie-break deterministic.
pub async fn collect_items(
    client: &reqwest::Client,
    sources: &[Source],
    detail: Detail,
) -> Vec<CanonicalItem> {
    ensure_metrics_described();
    let now = Utc::now();

    let fetches = sources.iter().map(|s| source_items(client, s, detail, now));
    let items: Vec<CanonicalItem> = futures::future::join_all(fetches)
        .await
        .into_iter()
        .flatten()
        .collect();

    counter!("feeds_kept_total").increment(items.len() as u64);
    gauge!("feeds_last_run_ts").set(now.timestamp().max(0) as f64);
    tracing::info!(kept = items.len(), sources = sources.len(), "feed cycle");

    items
}

/// Freshest-first digest selection, capped at [`DIGEST_LIMIT`].
/// The sort is stable, so items with equal dates keep merge order.
pub fn select_digest(mut items: Vec<CanonicalItem>) -> Vec<CanonicalItem> {
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(DIGEST_LIMIT);
    items
}

/// The single freshest item across all sources, if any survived.
pub fn select_freshest(items: Vec<CanonicalItem>) -> Option<CanonicalItem> {
    let mut items = items;
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.into_iter().next()
}
