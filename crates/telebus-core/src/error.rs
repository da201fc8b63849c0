//! Error types for talking to the Bot API.
//!
//! Command-layer errors (registration, parsing) live in `telebus-framework`.

use thiserror::Error;

/// Errors returned by [`BotApi`](crate::BotApi) calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No transport is attached to this API handle.
    #[error("bot is not connected")]
    NotConnected,

    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,

    /// Telegram answered with `ok: false`.
    #[error("Telegram API error ({error_code}): {description}")]
    Telegram {
        /// The `error_code` field of the response.
        error_code: i64,
        /// The human readable `description` field.
        description: String,
    },

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates an [`ApiError::Other`] from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
