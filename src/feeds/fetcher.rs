// src/feeds/fetcher.rs
use metrics::counter;

use crate::config::Source;

/// Fetch the raw feed document for one source.
///
/// Never propagates a failure: a non-2xx status, transport error, or
/// unreadable body is logged, counted, and collapses to `None` so the
/// source simply contributes nothing this cycle.
pub async fn fetch_feed(client: &reqwest::Client, source: &Source) -> Option<String> {
    let resp = match client.get(&source.url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(error = ?e, feed = %source.url, "feed transport error");
            counter!("feeds_fetch_errors_total").increment(1);
            return None;
        }
    };

    if !resp.status().is_success() {
        tracing::warn!(status = %resp.status(), feed = %source.url, "feed http error");
        counter!("feeds_fetch_errors_total").increment(1);
        return None;
    }

    match resp.text().await {
        Ok(xml) => Some(xml),
        Err(e) => {
            tracing::warn!(error = ?e, feed = %source.url, "feed body read error");
            counter!("feeds_fetch_errors_total").increment(1);
            None
        }
    }
}
