//! CompletionClient implementation.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice};
use crate::backend::CompletionBackend;
use crate::config::CompletionConfig;
use crate::error::CompletionError;
use crate::history::ConversationHistory;

/// A client for an OpenAI-style chat completion endpoint.
///
/// When history is enabled, each session (one chat) accumulates its own list
/// of user and assistant messages which is replayed in front of every new
/// query from that session.
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
    history: ConversationHistory,
}

impl CompletionClient {
    /// Create a new CompletionClient with the given configuration.
    ///
    /// Fails if the API token is empty. An empty model falls back to the
    /// default model.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let config = config.validated()?;

        let client = Client::builder().build().map_err(|e| {
            CompletionError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let history = match config.max_history_messages {
            Some(max) => ConversationHistory::bounded(max),
            None => ConversationHistory::new(),
        };

        info!(
            "CompletionClient initialized with model: {}, keep_history: {}, strip_newline: {}",
            config.model, config.keep_history, config.strip_newline
        );

        Ok(Self {
            client,
            config,
            history,
        })
    }

    /// Create a CompletionClient from environment variables.
    ///
    /// See [`CompletionConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(CompletionConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Snapshot of the stored history for a session.
    pub async fn history(&self, session: &str) -> Vec<ChatMessage> {
        self.history.get(session).await
    }

    /// Clear conversation history for a specific session.
    pub async fn clear_history(&self, session: &str) {
        self.history.clear(session).await;
    }

    /// Clear all conversation histories.
    pub async fn clear_all_history(&self) {
        self.history.clear_all().await;
    }

    /// Send `text` for `session` and return the (post-processed) choices.
    pub async fn query(&self, session: &str, text: &str) -> Result<Vec<Choice>, CompletionError> {
        debug!("Querying completion API for session {}: {}", session, text);

        let user_message = ChatMessage::user(text);
        let messages = self.build_messages(session, user_message.clone()).await;

        let completion = self.chat_completion(messages).await?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let mut choices = completion.choices;
        if self.config.strip_newline {
            for choice in &mut choices {
                strip_leading_blank_line(&mut choice.message.content);
            }
        }

        if self.config.keep_history {
            let responses: Vec<ChatMessage> =
                choices.iter().map(|choice| choice.message.clone()).collect();
            self.history
                .add_exchange(session, user_message, &responses)
                .await;
        }

        Ok(choices)
    }

    /// Build the messages array for a chat completion request.
    async fn build_messages(&self, session: &str, user_message: ChatMessage) -> Vec<ChatMessage> {
        let mut messages = Vec::new();

        if let Some(ref system_prompt) = self.config.system_prompt {
            messages.push(ChatMessage::system(system_prompt.clone()));
        }

        if self.config.keep_history {
            messages.extend(self.history.get(session).await);
        }

        messages.push(user_message);
        messages
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let url = self.config.completions_url();

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            sampling: self.config.sampling.clone(),
        };
        let body = serde_json::to_vec(&request).map_err(CompletionError::Serialization)?;

        debug!("Sending request to completion API: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = match serde_json::from_str::<ApiError>(&text) {
                Ok(api_error) => api_error.error.describe(),
                Err(_) => text,
            };
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(CompletionError::Decode)?;

        debug!("Received response from completion API: {:?}", completion);

        Ok(completion)
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn query(&self, session: &str, text: &str) -> Result<Vec<Choice>, CompletionError> {
        CompletionClient::query(self, session, text).await
    }

    async fn clear_history(&self, session: &str) {
        CompletionClient::clear_history(self, session).await;
    }

    fn name(&self) -> &str {
        "CompletionClient"
    }
}

/// Remove one leading "\n\n" from `content`. Applied once, never repeated.
pub fn strip_leading_blank_line(content: &mut String) {
    if content.len() >= 2 && content.starts_with("\n\n") {
        content.drain(..2);
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .field("keep_history", &self.config.keep_history)
            .finish()
    }
}
