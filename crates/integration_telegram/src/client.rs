//! Telegram Bot API client
//!
//! Calls Bot API methods over HTTPS with JSON bodies. Updates are received by
//! long polling (`getUpdates`), so no public endpoint is needed.

use std::{fmt, time::Duration};

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::types::{
    ApiResponse, GetUpdatesRequest, Message, ParseMode, ReplyMarkup, SendLocationRequest,
    SendMessageRequest, Update, User,
};

/// Telegram API errors
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error: {code} - {description}")]
    Api { code: i32, description: String },

    #[error("Missing configuration: {0}")]
    Configuration(String),
}

// Request URLs carry the bot token in their path
impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// Telegram client configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Token issued by @BotFather
    pub bot_token: String,
    /// Bot API root, without trailing slash
    pub api_base_url: String,
    /// Long polling timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
    /// Timeout for a single request on top of the polling timeout
    pub request_timeout_secs: u64,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

/// Telegram client for the Bot API
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        if config.bot_token.is_empty() {
            return Err(TelegramError::Configuration(
                "bot_token is required".to_string(),
            ));
        }
        if config.api_base_url.is_empty() {
            return Err(TelegramError::Configuration(
                "api_base_url is required".to_string(),
            ));
        }

        // A long poll holds the connection open for up to poll_timeout_secs
        let client = Client::builder()
            .timeout(Duration::from_secs(
                config.poll_timeout_secs + config.request_timeout_secs,
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse<R> = response.json().await?;

        match body.result {
            Some(result) if body.ok => Ok(result),
            _ => {
                let code = body
                    .error_code
                    .unwrap_or_else(|| i32::from(status.as_u16()));
                let description = body
                    .description
                    .unwrap_or_else(|| "no description".to_string());
                warn!(method, code, %description, "Bot API call failed");
                Err(TelegramError::Api { code, description })
            },
        }
    }

    /// Long-poll for updates with an id of at least `offset`
    #[instrument(skip(self))]
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "Received updates");
        }
        Ok(updates)
    }

    /// Send a text message
    #[instrument(skip(self, text, reply_markup), fields(text_len = text.len()))]
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            reply_markup,
        };
        self.call("sendMessage", &request).await
    }

    /// Send a map pin
    #[instrument(skip(self))]
    pub async fn send_location(
        &self,
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Message, TelegramError> {
        let request = SendLocationRequest {
            chat_id,
            latitude,
            longitude,
        };
        self.call("sendLocation", &request).await
    }

    /// Identity of the bot; used to check the token at startup
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }
}

/// Escape text for use inside an HTML formatted message
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
