//! Bot API wire types.

mod send;
mod update;

pub use send::{GetUpdatesParams, ReplyParameters, SendMessageParams};
pub use update::{Chat, Message, Update, User};

use serde::Deserialize;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Method result when `ok` is true.
    pub result: Option<T>,
    /// Human-readable error when `ok` is false.
    #[serde(default)]
    pub description: Option<String>,
    /// Error code when `ok` is false.
    #[serde(default)]
    pub error_code: Option<i32>,
}
