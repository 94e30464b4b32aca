//! Configuration types for telegram-bot.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::BotError;

/// Public Bot API host.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default long-poll timeout in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;

/// Configuration for connecting to the Bot API.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token issued by @BotFather.
    pub token: String,
    /// Base URL of the Bot API (e.g., "https://api.telegram.org").
    pub api_url: String,
    /// How long the server may hold a `getUpdates` request open.
    pub poll_timeout: Duration,
    /// Pause before polling again after a failed poll.
    pub error_delay: Duration,
    /// Update kinds to receive.
    pub allowed_updates: Vec<String>,
}

impl BotConfig {
    /// Create a new configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            error_delay: Duration::from_secs(1),
            allowed_updates: vec!["message".to_string()],
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required: `TELEGRAM_BOT_TOKEN`.
    /// Optional: `TELEGRAM_API_URL`, `TELEGRAM_POLL_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self, BotError> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BotError::Config("TELEGRAM_BOT_TOKEN not set".to_string()))?;

        let mut config = Self::new(token);
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            config.api_url = url;
        }
        if let Some(secs) = env::var("TELEGRAM_POLL_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.poll_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Use a different API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Use a different long-poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Use a different pause after failed polls.
    pub fn with_error_delay(mut self, delay: Duration) -> Self {
        self.error_delay = delay;
        self
    }

    /// Get the endpoint URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }

    /// Request timeout for the HTTP client: long enough for a full long poll.
    pub fn request_timeout(&self) -> Duration {
        self.poll_timeout + Duration::from_secs(10)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .field("error_delay", &self.error_delay)
            .field("allowed_updates", &self.allowed_updates)
            .finish()
    }
}
