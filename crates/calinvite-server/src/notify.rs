//! Telegram notification sender.
//!
//! This module posts plain-text messages to a Telegram bot chat. It shares
//! no state with the calendar flow: it is a library call with no inbound
//! interface. The remote response body is returned verbatim - Telegram's
//! own `ok`/`error_code` fields are not interpreted here.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Telegram API base URL.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Request timeout for the Telegram API.
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the notifier.
///
/// The first three fire before any network call is made.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No bot token configured.
    #[error("TELEGRAM_TOKEN is not configured")]
    MissingBotToken,

    /// No chat id given and no default configured.
    #[error("no chat id provided and no default configured")]
    MissingChatId,

    /// Empty message.
    #[error("message is required")]
    EmptyMessage,

    /// The POST to the Telegram API failed at the transport level.
    #[error("telegram request failed: {0}")]
    Network(String),

    /// The Telegram API returned a body that is not JSON.
    #[error("invalid telegram response: {0}")]
    InvalidResponse(String),
}

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    /// The bot token from @BotFather.
    pub bot_token: Option<String>,

    /// Chat to send to when the caller does not name one.
    ///
    /// To find a chat id, send the bot a message and look for
    /// `"chat":{"id":...}` in `https://api.telegram.org/bot<token>/getUpdates`.
    pub default_chat_id: Option<String>,
}

/// Sends plain-text messages to a Telegram bot chat.
#[derive(Debug)]
pub struct Notifier {
    config: NotifierConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl Notifier {
    /// Creates a notifier with the given configuration.
    pub fn new(config: NotifierConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(TELEGRAM_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self {
            config,
            http_client,
            base_url: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL. Used by tests to point at a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sends `message` to `chat_id`, or to the configured default chat.
    ///
    /// Fails fast - without any network call - when the bot token is
    /// unconfigured, no chat id is available, or the message is empty.
    /// Otherwise issues a single POST and returns the parsed response body
    /// verbatim, whatever it contains.
    pub async fn notify(
        &self,
        message: &str,
        chat_id: Option<&str>,
    ) -> Result<serde_json::Value, NotifyError> {
        let bot_token = self
            .config
            .bot_token
            .as_deref()
            .ok_or(NotifyError::MissingBotToken)?;
        let chat_id = chat_id
            .or(self.config.default_chat_id.as_deref())
            .ok_or(NotifyError::MissingChatId)?;
        if message.is_empty() {
            return Err(NotifyError::EmptyMessage);
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, bot_token);
        debug!("sending telegram message to chat {}", chat_id);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": message,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))
    }
}
