//! Message relay that connects telegram-bot to a completion backend.

use std::future::Future;

use chat_completion::{CompletionBackend, CompletionError};
use futures::{Stream, StreamExt};
use telegram_bot::{BotError, TelegramClient, Update};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::RelayConfig;

/// Errors that can occur while relaying messages.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Error from the completion backend.
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    /// The update stream ended unexpectedly.
    #[error("update stream ended")]
    StreamEnded,
}

/// Result of relaying a single update.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The model was queried and its choices were sent back.
    Replied {
        chat_id: i64,
        sent: usize,
        failed: usize,
    },
    /// The chat's history was cleared on request.
    Cleared { chat_id: i64 },
    /// The update was skipped (no message, or no text).
    Skipped { reason: String },
    /// The completion request failed; nothing was sent.
    Error(RelayError),
}

/// Receives Telegram updates one at a time and answers each text message
/// with the backend's choices.
pub struct MessageRelay<B: CompletionBackend> {
    client: TelegramClient,
    backend: B,
    config: RelayConfig,
}

impl<B: CompletionBackend> MessageRelay<B> {
    /// Create a new relay.
    pub fn new(client: TelegramClient, backend: B, config: RelayConfig) -> Self {
        Self {
            client,
            backend,
            config,
        }
    }

    /// Create a relay with default configuration.
    pub fn with_defaults(client: TelegramClient, backend: B) -> Self {
        Self::new(client, backend, RelayConfig::default())
    }

    /// Get a reference to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a reference to the client.
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    /// Relay a single update and report what happened.
    pub async fn process_update(&self, update: &Update) -> RelayOutcome {
        let Some(ref message) = update.message else {
            return RelayOutcome::Skipped {
                reason: "no message".to_string(),
            };
        };
        let Some(ref text) = message.text else {
            return RelayOutcome::Skipped {
                reason: "no text content".to_string(),
            };
        };

        let chat_id = message.chat.id;
        let session = chat_id.to_string();

        if self.config.is_clear_command(text) {
            self.backend.clear_history(&session).await;
            info!("Cleared history for chat {}", chat_id);
            if let Err(e) = self
                .client
                .send_reply(chat_id, &self.config.clear_reply, message.message_id)
                .await
            {
                warn!("Failed to confirm history clear in chat {}: {}", chat_id, e);
            }
            return RelayOutcome::Cleared { chat_id };
        }

        info!("Processing message from chat {}", chat_id);
        debug!("Message text from chat {}: {}", chat_id, text);

        let choices = match self.backend.query(&session, text).await {
            Ok(choices) => choices,
            Err(e) => {
                error!("Completion error for chat {}: {}", chat_id, e);
                return RelayOutcome::Error(RelayError::Completion(e));
            }
        };

        if choices.is_empty() {
            warn!("Completion for chat {} returned no choices", chat_id);
        }

        let mut sent = 0;
        let mut failed = 0;
        for choice in &choices {
            match self
                .client
                .send_reply(chat_id, &choice.message.content, message.message_id)
                .await
            {
                Ok(reply) => {
                    debug!(
                        "Sent choice {} to chat {} (message_id={})",
                        choice.index, chat_id, reply.message_id
                    );
                    sent += 1;
                }
                Err(e) => {
                    error!("Failed to send choice {} to chat {}: {}", choice.index, chat_id, e);
                    failed += 1;
                }
            }
        }

        RelayOutcome::Replied {
            chat_id,
            sent,
            failed,
        }
    }

    /// Relay every update of `stream`, strictly in order, until the stream
    /// ends or `shutdown` resolves.
    ///
    /// Stream errors and failed updates are logged and skipped. Returns
    /// `Ok(())` on shutdown and [`RelayError::StreamEnded`] if the stream ends.
    pub async fn run_stream<S, F>(&self, stream: S, shutdown: F) -> Result<(), RelayError>
    where
        S: Stream<Item = Result<Update, BotError>> + Unpin,
        F: Future<Output = ()>,
    {
        let mut stream = stream;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("Shutdown signal received, stopping message relay");
                    return Ok(());
                }

                result = stream.next() => {
                    match result {
                        Some(Ok(update)) => match self.process_update(&update).await {
                            RelayOutcome::Replied { chat_id, sent, failed } => {
                                debug!("Replied to chat {} ({} sent, {} failed)", chat_id, sent, failed);
                            }
                            RelayOutcome::Cleared { chat_id } => {
                                debug!("Cleared chat {}", chat_id);
                            }
                            RelayOutcome::Skipped { reason } => {
                                debug!("Skipped update {}: {}", update.update_id, reason);
                            }
                            RelayOutcome::Error(e) => {
                                warn!("Error relaying update {}: {}", update.update_id, e);
                            }
                        },
                        Some(Err(e)) => {
                            error!("Update stream error: {}", e);
                        }
                        None => {
                            warn!("Update stream ended");
                            return Err(RelayError::StreamEnded);
                        }
                    }
                }
            }
        }
    }

    /// Long-poll Telegram and relay updates until `shutdown` resolves.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> Result<(), RelayError>
    where
        F: Future<Output = ()>,
    {
        info!("Starting message relay with backend: {}", self.backend.name());

        let stream = telegram_bot::subscribe(&self.client);
        self.run_stream(stream, shutdown).await
    }

    /// Long-poll Telegram and relay updates until the stream ends.
    pub async fn run(self) -> Result<(), RelayError> {
        self.run_with_shutdown(futures::future::pending()).await
    }
}
