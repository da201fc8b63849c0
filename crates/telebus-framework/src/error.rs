//! Error types for the command layer.

use thiserror::Error;

/// Raised while registering commands.
///
/// These are configuration mistakes. A bus that failed to register a command
/// should not be put in front of traffic, so callers are expected to abort
/// startup rather than log and continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A command key does not resolve to any known factory.
    #[error("command '{0}' is not registered in the catalog")]
    UnknownCommand(String),

    /// The command's name cannot be matched as a `/command` token.
    #[error("invalid command name '{name}': {reason}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An alias equals the name of a registered command (or of itself).
    #[error("alias '{alias}' collides with command name '{command}'")]
    AliasCollidesWithName {
        /// The rejected alias.
        alias: String,
        /// The command that already owns the name.
        command: String,
    },

    /// An alias is already claimed by another command.
    #[error("alias '{alias}' is already used by command '{command}'")]
    AliasCollidesWithAlias {
        /// The rejected alias.
        alias: String,
        /// The command that already owns the alias.
        command: String,
    },

    /// A command name equals an alias owned by a different command.
    #[error("command name '{name}' collides with an alias of command '{command}'")]
    NameCollidesWithAlias {
        /// The rejected name.
        name: String,
        /// The command that owns the alias.
        command: String,
    },

    /// The argument pattern did not compile to a valid regex.
    #[error("invalid argument pattern for command '{command}': {reason}")]
    InvalidPattern {
        /// The command whose pattern failed.
        command: String,
        /// The regex compiler's message.
        reason: String,
    },
}

/// Raised while extracting a command name from message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The message text is empty or whitespace only.
    #[error("message text is empty, cannot parse a command")]
    EmptyMessage,

    /// The entity span does not fit on the message text.
    #[error("entity span (offset {offset}, length {length}) does not fit the message text")]
    EntityOutOfBounds {
        /// UTF-16 offset reported by Telegram.
        offset: usize,
        /// UTF-16 length reported by Telegram.
        length: usize,
    },
}

/// Any error surfaced by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for registration operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Result type for command layer operations.
pub type CommandResult<T> = Result<T, CommandError>;
