//! Trend Channel Bot — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_channel_bot::api::{create_router, AppState};
use trend_channel_bot::config::Config;
use trend_channel_bot::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - TRENDS_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("TRENDS_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trend_channel_bot=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = Config::from_env();
    if config.telegram.is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHANNEL_ID missing; send endpoints will answer 500");
    }

    let metrics = Metrics::init(config.sources.len());

    let state = AppState::new(config);
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
