//! Telegram Bot API HTTP client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::error::BotError;
use crate::types::{ApiResponse, GetUpdatesParams, Message, SendMessageParams, Update, User};

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Create a client without contacting the API.
    pub fn new(config: BotConfig) -> Result<Self, BotError> {
        if config.token.is_empty() {
            return Err(BotError::Config("bot token is not set".to_string()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(BotError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a client and verify the token with `getMe`.
    ///
    /// Returns the client together with the bot's own account.
    pub async fn connect(config: BotConfig) -> Result<(Self, User), BotError> {
        let client = Self::new(config)?;
        let me = client.get_me().await?;

        info!(
            "Authorized on account {}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );

        Ok((client, me))
    }

    /// Get the bot's own account.
    pub async fn get_me(&self) -> Result<User, BotError> {
        self.api_call("getMe", &serde_json::json!({})).await
    }

    /// Fetch updates newer than `offset`, holding the request open for up to
    /// the configured poll timeout.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, BotError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: self.config.allowed_updates.clone(),
        };
        self.api_call("getUpdates", &params).await
    }

    /// Send a message using the full SendMessageParams structure.
    pub async fn send_message(&self, params: SendMessageParams) -> Result<Message, BotError> {
        self.api_call("sendMessage", &params).await
    }

    /// Send a text message as a reply to `reply_to` in the same chat.
    pub async fn send_reply(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: i64,
    ) -> Result<Message, BotError> {
        self.send_message(SendMessageParams::text(chat_id, text).reply_to(reply_to))
            .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Call a Bot API method and unwrap its response envelope.
    async fn api_call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, BotError> {
        let url = self.config.method_url(method);

        debug!("Bot API call: {}", method);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .body(serde_json::to_vec(params)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(BotError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => return Err(BotError::Json(e)),
        };

        if !envelope.ok {
            return Err(BotError::Api {
                code: envelope.error_code.unwrap_or(status.as_u16() as i32),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope.result.ok_or_else(|| BotError::Api {
            code: -1,
            description: "No result in response".to_string(),
        })
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}
