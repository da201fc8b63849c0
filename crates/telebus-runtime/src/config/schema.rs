//! Configuration schema definitions.
//!
//! ```toml
//! default_bot = "main"
//!
//! [[bots]]
//! name = "main"
//! username = "MyTelegramBot"
//! token = "123:abc"
//! commands = ["start", "admin"]
//!
//! [commands]
//! help = true
//! suffix_matching = "strict"
//! shared = ["about"]
//!
//! [commands.groups]
//! admin = ["ban", "kick"]
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use telebus_framework::SuffixMatching;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelebusConfig {
    /// Name of the bot returned by `BotManager::default_bot`.
    #[serde(default = "default_bot_name")]
    pub default_bot: String,

    /// Individual bot configurations.
    #[serde(default)]
    pub bots: Vec<BotConfig>,

    /// Command settings shared by every bot.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelebusConfig {
    fn default() -> Self {
        Self {
            default_bot: default_bot_name(),
            bots: Vec::new(),
            commands: CommandsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelebusConfig {
    /// Looks up a bot by name.
    pub fn bot(&self, name: &str) -> Option<&BotConfig> {
        self.bots.iter().find(|bot| bot.name == name)
    }
}

fn default_bot_name() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Bots
// =============================================================================

/// Individual bot configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Unique name used to look the bot up.
    pub name: String,

    /// Telegram username, without `@`.
    #[serde(default)]
    pub username: Option<String>,

    /// Bot API token.
    #[serde(default)]
    pub token: String,

    /// Command keys and group names for this bot.
    #[serde(default)]
    pub commands: Vec<String>,
}

impl BotConfig {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: None,
            token: token.into(),
            commands: Vec::new(),
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("commands", &self.commands)
            .finish()
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Register the built-in `/help` command on every bot. It also answers
    /// unknown commands.
    #[serde(default = "default_true")]
    pub help: bool,

    /// How the `@botname` suffix is matched in argument patterns.
    #[serde(default)]
    pub suffix_matching: SuffixMatching,

    /// Command keys added to every bot.
    #[serde(default)]
    pub shared: Vec<String>,

    /// Named lists of command keys. Groups may include other groups.
    #[serde(default)]
    pub groups: HashMap<String, Vec<String>>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            help: true,
            suffix_matching: SuffixMatching::default(),
            shared: Vec::new(),
            groups: HashMap::new(),
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `Full` without it.
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// File rotation for [`LogOutput::File`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global level; `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file, required for [`LogOutput::File`].
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-module levels, e.g. `telebus_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}
