//! Configuration for telebus bots.
//!
//! Layered loading (files, profiles, `TELEBUS_*` variables), the schema,
//! validation, and expansion of command groups into catalog keys.

pub mod error;
pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, Profile, load_config, load_config_from_file};
pub use resolve::resolve_command_keys;
pub use schema::{
    BotConfig, CommandsConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    SpanEventConfig, TelebusConfig,
};
pub use validation::validate_config;
