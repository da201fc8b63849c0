//! Runtime error types.

use telebus_core::ApiError;
use telebus_framework::{CommandError, RegistrationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building or running bots.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registering or dispatching a command failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A call to the Bot API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Bot not found.
    #[error("Bot not found: {0}")]
    BotNotFound(String),

    /// A webhook body is not a valid update.
    #[error("Failed to decode update: {0}")]
    UpdateDecode(#[from] serde_json::Error),
}

impl From<RegistrationError> for RuntimeError {
    fn from(error: RegistrationError) -> Self {
        Self::Command(error.into())
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
