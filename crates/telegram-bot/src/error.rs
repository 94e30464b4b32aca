//! Error types for telegram-bot.

use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum BotError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i32, description: String },

    /// Non-success status without a parseable API envelope.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
