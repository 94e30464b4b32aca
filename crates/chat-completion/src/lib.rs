//! OpenAI-style chat completion client.
//!
//! This crate sends user messages to a chat completion endpoint and returns
//! the ranked choices the model produced.
//!
//! # Features
//!
//! - Optional per-session conversation history, replayed with every query
//! - Optional stripping of the leading blank line models like to emit
//! - Sampling parameters (temperature, top_p, n, stop, ...) from config
//! - Configurable via environment variables
//! - [`CompletionBackend`] trait for plugging the client into a relay
//!
//! # Usage
//!
//! ```rust,no_run
//! use chat_completion::{CompletionClient, CompletionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompletionConfig::builder()
//!         .api_key("sk-...")
//!         .keep_history(true)
//!         .strip_newline(true)
//!         .build();
//!     let client = CompletionClient::new(config)?;
//!
//!     for choice in client.query("chat-1", "Hello!").await? {
//!         println!("{}", choice.message.content);
//!     }
//!     Ok(())
//! }
//! ```

mod api_types;
mod backend;
mod client;
mod config;
mod error;
mod history;

pub use api_types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, SamplingParams,
    StopSequences, Usage, ROLE_ASSISTANT, ROLE_SYSTEM, ROLE_USER,
};
pub use backend::CompletionBackend;
pub use client::{strip_leading_blank_line, CompletionClient};
pub use config::{CompletionConfig, CompletionConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};
pub use error::CompletionError;
pub use history::ConversationHistory;

// Re-export async_trait for implementors of CompletionBackend
pub use async_trait::async_trait;
