//! Relay configuration.

use std::env;

/// Default command that wipes a chat's history.
pub const DEFAULT_CLEAR_COMMAND: &str = "/clear";

/// Configuration for the message relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Command that clears the chat's conversation history (None disables it).
    pub clear_command: Option<String>,

    /// Text sent back after the history was cleared.
    pub clear_reply: String,

    /// The bot's username, used to match `/clear@username` in groups.
    pub bot_username: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            clear_command: Some(DEFAULT_CLEAR_COMMAND.to_string()),
            clear_reply: "History cleared.".to_string(),
            bot_username: None,
        }
    }
}

impl RelayConfig {
    /// Create configuration from environment variables.
    ///
    /// - `RELAY_CLEAR_COMMAND` - clear command (default: /clear, empty disables)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(command) = env::var("RELAY_CLEAR_COMMAND") {
            config.clear_command = Some(command).filter(|c| !c.is_empty());
        }
        config
    }

    /// Set the bot's username.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Check whether `text` is the clear command, optionally addressed to
    /// this bot as `/clear@username`.
    pub fn is_clear_command(&self, text: &str) -> bool {
        let Some(ref command) = self.clear_command else {
            return false;
        };

        let first = text.split_whitespace().next().unwrap_or_default();
        match first.split_once('@') {
            Some((name, target)) => {
                name == command.as_str()
                    && self
                        .bot_username
                        .as_deref()
                        .map_or(true, |me| me.eq_ignore_ascii_case(target))
            }
            None => first == command.as_str(),
        }
    }
}
