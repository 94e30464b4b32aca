//! The CompletionBackend trait definition.

use async_trait::async_trait;

use crate::api_types::Choice;
use crate::error::CompletionError;

/// Something that turns a user message into ranked completion choices.
///
/// The relay depends on this trait rather than on the HTTP client so it can
/// be driven by scripted backends in tests. Object-safe.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `text` on behalf of `session` and return the model's choices.
    async fn query(&self, session: &str, text: &str) -> Result<Vec<Choice>, CompletionError>;

    /// Forget everything remembered for `session`.
    async fn clear_history(&self, session: &str);

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}
