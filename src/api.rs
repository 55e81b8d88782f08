// src/api.rs
use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde_json::{json, Value};
use shuttle_axum::axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::cors::CorsLayer;

use crate::caption;
use crate::config::Config;
use crate::feeds::{self, Detail};
use crate::telegram::{TelegramClient, TelegramError};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    http: reqwest::Client,
    telegram: Option<TelegramClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let telegram = config
            .telegram
            .as_ref()
            .map(|cfg| TelegramClient::new(http.clone(), cfg));
        Self {
            config: Arc::new(config),
            http,
            telegram,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    ensure_metrics_described();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/send-trends", get(send_trends).post(send_trends))
        .route("/api/send-news", get(send_news).post(send_news))
        .route("/api/send-test", get(send_test).post(send_test))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("telegram_send_total", "Telegram send attempts.");
        describe_counter!(
            "telegram_send_errors_total",
            "Telegram sends that failed or were rejected."
        );
    });
}

/// Response envelope shared by every endpoint:
/// `{ ok, result? }` with 200, or `{ ok, error? }` with 500.
#[derive(serde::Serialize)]
pub struct Envelope {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
}

type Reply = (StatusCode, Json<Envelope>);

fn ok_reply(result: Value) -> Reply {
    (
        StatusCode::OK,
        Json(Envelope {
            ok: true,
            result: Some(result),
            error: None,
        }),
    )
}

fn err_reply(error: Value) -> Reply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope {
            ok: false,
            result: None,
            error: Some(error),
        }),
    )
}

fn missing_config_reply() -> Reply {
    err_reply(json!(
        "Missing TELEGRAM_BOT_TOKEN or TELEGRAM_CHANNEL_ID env vars"
    ))
}

/// Multi-item digest endpoint: merge all sources, post the top-6 digest,
/// or the fixed notice when every source came back empty.
async fn send_trends(State(state): State<AppState>) -> Reply {
    let Some(telegram) = state.telegram.clone() else {
        return missing_config_reply();
    };

    let items = feeds::collect_items(&state.http, &state.config.sources, Detail::Headline).await;
    let text = if items.is_empty() {
        caption::NO_TRENDS_TEXT.to_string()
    } else {
        caption::digest_caption(&feeds::select_digest(items))
    };

    dispatch(telegram.send_message(&text).await)
}

/// Single-item endpoint: the freshest item across all sources, as a photo
/// when the item carries an image, otherwise as text.
async fn send_news(State(state): State<AppState>) -> Reply {
    let Some(telegram) = state.telegram.clone() else {
        return missing_config_reply();
    };

    let items = feeds::collect_items(&state.http, &state.config.sources, Detail::Full).await;
    let sent = match feeds::select_freshest(items) {
        None => telegram.send_message(caption::NO_FRESH_NEWS_TEXT).await,
        Some(item) => {
            let text = caption::news_caption(&item);
            match item.image.as_deref() {
                Some(photo) => telegram.send_photo(photo, &text).await,
                None => telegram.send_message(&text).await,
            }
        }
    };

    dispatch(sent)
}

/// Connectivity check: posts a fixed text to the channel.
async fn send_test(State(state): State<AppState>) -> Reply {
    let Some(telegram) = state.telegram.clone() else {
        return missing_config_reply();
    };

    dispatch(telegram.send_message(caption::TEST_TEXT).await)
}

fn dispatch(sent: Result<Value, TelegramError>) -> Reply {
    counter!("telegram_send_total").increment(1);
    match sent {
        Ok(result) => ok_reply(result),
        Err(TelegramError::Api(payload)) => {
            counter!("telegram_send_errors_total").increment(1);
            err_reply(payload)
        }
        Err(e) => {
            counter!("telegram_send_errors_total").increment(1);
            tracing::error!(error = ?e, "telegram send failed");
            err_reply(json!(e.to_string()))
        }
    }
}
