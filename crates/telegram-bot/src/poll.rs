//! Long-polling update stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, warn};

use crate::client::TelegramClient;
use crate::error::BotError;
use crate::types::Update;

/// An unbounded stream of incoming updates.
///
/// Each `getUpdates` call confirms everything received before it by passing
/// `offset = last update_id + 1`, so an update is yielded at most once. A
/// failed poll is yielded as an error, after which the stream waits
/// [`BotConfig::error_delay`](crate::BotConfig::error_delay) and polls again.
pub struct UpdateStream {
    inner: BoxStream<'static, Result<Update, BotError>>,
}

struct PollState {
    client: TelegramClient,
    offset: Option<i64>,
    pending: VecDeque<Update>,
    last_poll_failed: bool,
}

impl UpdateStream {
    /// Start polling from the oldest unconfirmed update.
    pub fn new(client: &TelegramClient) -> Self {
        Self::from_offset(client, None)
    }

    /// Start polling at a known offset.
    pub fn from_offset(client: &TelegramClient, offset: Option<i64>) -> Self {
        let state = PollState {
            client: client.clone(),
            offset,
            pending: VecDeque::new(),
            last_poll_failed: false,
        };

        Self {
            inner: stream::unfold(state, next_update).boxed(),
        }
    }
}

async fn next_update(mut state: PollState) -> Option<(Result<Update, BotError>, PollState)> {
    loop {
        if let Some(update) = state.pending.pop_front() {
            return Some((Ok(update), state));
        }

        if state.last_poll_failed {
            tokio::time::sleep(state.client.config().error_delay).await;
            state.last_poll_failed = false;
        }

        match state.client.get_updates(state.offset).await {
            Ok(updates) => {
                debug!("Received {} update(s)", updates.len());
                if let Some(max_id) = updates.iter().map(|u| u.update_id).max() {
                    state.offset = Some(max_id + 1);
                }
                state.pending.extend(updates);
            }
            Err(e) => {
                warn!("getUpdates failed: {}", e);
                state.last_poll_failed = true;
                return Some((Err(e), state));
            }
        }
    }
}

impl Stream for UpdateStream {
    type Item = Result<Update, BotError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Create an update stream from a TelegramClient.
pub fn subscribe(client: &TelegramClient) -> UpdateStream {
    UpdateStream::new(client)
}
