//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the Telegram Bot HTTP API.
//! It supports:
//!
//! - Verifying the bot token (`getMe`)
//! - Receiving updates via long polling (`getUpdates`)
//! - Sending text messages, optionally as replies (`sendMessage`)
//!
//! # Example
//!
//! ```no_run
//! use telegram_bot::{BotConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram_bot::BotError> {
//! let (client, me) = TelegramClient::connect(BotConfig::new("123:ABC")).await?;
//! println!("Running as {:?}", me.username);
//!
//! use futures::StreamExt;
//! let mut updates = telegram_bot::subscribe(&client);
//! while let Some(result) = updates.next().await {
//!     match result {
//!         Ok(update) => {
//!             if let Some(message) = update.text_message() {
//!                 client
//!                     .send_reply(message.chat.id, "got it", message.message_id)
//!                     .await?;
//!             }
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use client::TelegramClient;
pub use config::{BotConfig, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT_SECS};
pub use error::BotError;
pub use poll::{subscribe, UpdateStream};
pub use types::*;
