// src/telegram.rs
//
// Thin Telegram Bot API client. The remote's JSON `ok` flag is the
// acknowledgement: a negative acknowledgement surfaces as an `Api` error
// carrying the remote payload, never as a silent success.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::TelegramConfig;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed before an acknowledgement was read.
    #[error("telegram http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Telegram acknowledged negatively; the remote error payload is kept.
    #[error("telegram api rejected request: {0}")]
    Api(Value),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    result: Option<Value>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(client: Client, cfg: &TelegramConfig) -> Self {
        Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            bot_token: cfg.bot_token.clone(),
            chat_id: cfg.channel_id.clone(),
        }
    }

    /// Send a text message to the channel. Returns the remote result
    /// payload on a positive acknowledgement.
    pub async fn send_message(&self, text: &str) -> Result<Value, TelegramError> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": false,
            }),
        )
        .await
    }

    /// Send a photo with caption to the channel.
    pub async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<Value, TelegramError> {
        self.call(
            "sendPhoto",
            json!({
                "chat_id": self.chat_id,
                "photo": photo_url,
                "caption": caption,
                "parse_mode": "HTML",
            }),
        )
        .await
    }

    async fn call(&self, method: &str, body: Value) -> Result<Value, TelegramError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.bot_token, method);

        let ack: ApiResponse = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !ack.ok {
            let payload = json!({
                "ok": false,
                "error_code": ack.error_code,
                "description": ack.description,
            });
            tracing::warn!(method, payload = %payload, "telegram rejected request");
            return Err(TelegramError::Api(payload));
        }

        Ok(ack.result.unwrap_or(Value::Null))
    }
}
