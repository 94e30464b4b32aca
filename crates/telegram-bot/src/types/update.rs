//! Update and message types received from the Bot API.

use serde::{Deserialize, Serialize};

/// An incoming update from `getUpdates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,

    /// New incoming message of any kind.
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// The message carried by this update, if it has text.
    pub fn text_message(&self) -> Option<&Message> {
        self.message.as_ref().filter(|message| message.text.is_some())
    }
}

/// A chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Identifier unique inside the chat.
    pub message_id: i64,

    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,

    /// Chat the message belongs to.
    pub chat: Chat,

    /// Sender, empty for messages sent to channels.
    #[serde(default)]
    pub from: Option<User>,

    /// UTF-8 text of a text message.
    #[serde(default)]
    pub text: Option<String>,
}

/// A chat (private, group, supergroup or channel).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,

    /// "private", "group", "supergroup" or "channel".
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,

    /// True if this user is a bot.
    #[serde(default)]
    pub is_bot: bool,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub username: Option<String>,
}
