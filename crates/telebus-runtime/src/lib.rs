//! Telebus Runtime - configuration, logging and bot management.
//!
//! This crate provides:
//! - Layered configuration loading with figment ([`config`])
//! - Logging setup on tracing-subscriber ([`logging`])
//! - [`Bot`], an API handle that owns its command bus
//! - [`BotManager`], which builds bots from configuration on demand
//!
//! ```ignore
//! use std::sync::Arc;
//! use telebus_runtime::{BotManager, config::load_config, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let manager = BotManager::new(config, catalog(), |bot| Arc::new(MyApi::new(&bot.token)));
//!     manager.connect_all()?;
//!
//!     let bot = manager.default_bot()?;
//!     // feed updates: bot.handle_webhook_body(&body).await?
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;

// Re-exports
pub use bot::Bot;
pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, TelebusConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{FmtSpan, LoggingBuilder};
pub use manager::{ApiFactory, BotManager};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and the `Level` type.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
