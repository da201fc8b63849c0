//! # Telebus
//!
//! Command dispatch for Telegram bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  Update  ┌─────┐  handler()  ┌────────────┐  Invocation  ┌─────────┐
//! │ webhook /  │─────────▶│ Bot │────────────▶│ CommandBus │─────────────▶│ Command │──▶ BotApi
//! │ polling    │          └─────┘             └────────────┘              └─────────┘
//! └────────────┘
//! ```
//!
//! - **Core**: Telegram update types and the [`BotApi`](core::BotApi) contract
//! - **Framework**: parser, argument patterns, the command bus and processor
//! - **Runtime**: configuration, logging, [`Bot`](runtime::Bot) and
//!   [`BotManager`](runtime::BotManager)
//!
//! Getting updates from Telegram and sending HTTP requests are left to the
//! application: implement [`BotApi`](core::BotApi) over your HTTP client and
//! feed updates to [`Bot::handle_update`](runtime::Bot::handle_update).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use telebus::prelude::*;
//!
//! let mut bot = Bot::new("main", Arc::new(MyApi::new(token)));
//! bot.add_command(HelpCommand)?;
//! bot.add_command(
//!     command("greet")
//!         .description("Say hello")
//!         .pattern("{name?}")
//!         .handler(|api, inv| {
//!             async move {
//!                 let name = inv.arg("name").filter(|n| !n.is_empty()).unwrap_or("stranger");
//!                 inv.reply_with_message(api, &format!("Hello, {name}!")).await?;
//!                 Ok(())
//!             }
//!             .boxed()
//!         }),
//! )?;
//!
//! let report = bot.handle_update(&update).await?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use telebus_core as core;
pub use telebus_framework as framework;
pub use telebus_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use telebus::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    pub use telebus_core::prelude::*;
    pub use telebus_framework::prelude::*;
    pub use telebus_runtime::{Bot, BotManager, ConfigLoader, RuntimeError, TelebusConfig};
}
