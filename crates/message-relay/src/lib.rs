//! Telegram to chat-completion relay.
//!
//! Receives Telegram messages by long polling, forwards their text to a
//! [`CompletionBackend`] and sends every returned choice back to the
//! originating chat as a reply to the triggering message.
//!
//! # Example
//!
//! ```no_run
//! use chat_completion::CompletionClient;
//! use message_relay::{MessageRelay, RelayConfig};
//! use telegram_bot::{BotConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = CompletionClient::from_env()?;
//! let (client, _me) = TelegramClient::connect(BotConfig::from_env()?).await?;
//!
//! let relay = MessageRelay::new(client, backend, RelayConfig::default());
//! relay.run().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod relay;

pub use config::{RelayConfig, DEFAULT_CLEAR_COMMAND};
pub use relay::{MessageRelay, RelayError, RelayOutcome};

// Re-export the collaborator types relay users need
pub use chat_completion::{CompletionBackend, CompletionClient, CompletionConfig};
pub use telegram_bot::{BotConfig, TelegramClient};
