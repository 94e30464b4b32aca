//! Error types for completion requests.

use thiserror::Error;

/// Errors that can occur when configuring or querying the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing or invalid configuration (e.g. no API token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request body could not be serialized.
    #[error("request serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Network or connection failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("completion API returned status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a valid completion response.
    #[error("failed to decode completion response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CompletionError {
    /// HTTP status code carried by a protocol error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
