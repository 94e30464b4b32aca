//! Request parameter types for Bot API methods.

use serde::Serialize;

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendMessageParams {
    /// Target chat.
    pub chat_id: i64,

    /// Text of the message.
    pub text: String,

    /// Message this one replies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,

    /// Send silently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl SendMessageParams {
    /// Create params for a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Thread the message as a reply to `message_id`.
    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_parameters = Some(ReplyParameters {
            message_id,
            allow_sending_without_reply: Some(true),
        });
        self
    }
}

/// Describes the message being replied to.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyParameters {
    /// Identifier of the message to reply to.
    pub message_id: i64,

    /// Send anyway if the original message was deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_sending_without_reply: Option<bool>,
}

/// Parameters for `getUpdates`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdatesParams {
    /// First update to return; confirms every earlier update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Long-poll timeout in seconds.
    pub timeout: u64,

    /// Update kinds to receive.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_updates: Vec<String>,
}
