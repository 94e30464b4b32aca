//! Per-session conversation history.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::api_types::{ChatMessage, ROLE_USER};

/// Conversation history keyed by session (one list per chat).
#[derive(Debug, Default)]
pub struct ConversationHistory {
    /// Map from session ID to its message history.
    histories: RwLock<HashMap<String, Vec<ChatMessage>>>,
    /// Maximum messages kept per session (None = unbounded).
    max_messages: Option<usize>,
}

impl ConversationHistory {
    /// Create an unbounded history store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history store that keeps at most `max_messages` per session.
    ///
    /// Whole exchanges are dropped from the front, so a session's history
    /// always starts with a user message.
    pub fn bounded(max_messages: usize) -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
            max_messages: Some(max_messages),
        }
    }

    /// Get the conversation history for a session.
    pub async fn get(&self, session: &str) -> Vec<ChatMessage> {
        let histories = self.histories.read().await;
        histories.get(session).cloned().unwrap_or_default()
    }

    /// Append a user message followed by the model's responses.
    pub async fn add_exchange(&self, session: &str, user: ChatMessage, responses: &[ChatMessage]) {
        let mut histories = self.histories.write().await;
        let history = histories.entry(session.to_string()).or_default();

        history.push(user);
        history.extend_from_slice(responses);

        if let Some(max) = self.max_messages {
            while history.len() > max {
                // Start of the second oldest exchange
                match history.iter().skip(1).position(|m| m.role == ROLE_USER) {
                    Some(next) => {
                        history.drain(..=next);
                    }
                    None => history.clear(),
                }
            }
        }
    }

    /// Empty the history for a session.
    pub async fn clear(&self, session: &str) {
        let mut histories = self.histories.write().await;
        histories.remove(session);
    }

    /// Clear all conversation histories.
    pub async fn clear_all(&self) {
        let mut histories = self.histories.write().await;
        histories.clear();
    }
}
