//! The command contract.
//!
//! A command is a named handler bound to a `/name` token. It may answer to
//! aliases, and it declares an argument [pattern](crate::pattern) used to
//! pull positional values out of the message text.
//!
//! There are two ways to define one:
//!
//! - Implement [`Command`] on your own type
//! - Use the [`command`] builder with an async closure
//!
//! ```rust,ignore
//! use futures::FutureExt;
//! use telebus_framework::command;
//!
//! let greet = command("greet")
//!     .alias("hi")
//!     .description("Say hello")
//!     .pattern("{name?}")
//!     .handler(|api, inv| {
//!         async move {
//!             let name = inv.arg("name").unwrap_or_default();
//!             inv.reply_with_message(api, &format!("Hello {name}!")).await?;
//!             Ok(())
//!         }
//!         .boxed()
//!     });
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use telebus_core::BotApi;

pub mod args;
pub mod builder;
pub mod invocation;

pub use args::CommandArgs;
pub use builder::{CommandBuilder, FnCommand, HandlerFn, command};
pub use invocation::Invocation;

/// A registered command handler.
///
/// Only [`name`](Command::name) and [`handle`](Command::handle) are required.
/// Implementations hold no per-invocation state: everything about the
/// current call arrives through the [`Invocation`].
#[async_trait]
pub trait Command: Send + Sync {
    /// The command name, without the leading slash.
    fn name(&self) -> &str;

    /// Alternative names the command answers to.
    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Short description, shown by the help command.
    fn description(&self) -> &str {
        ""
    }

    /// Argument pattern, e.g. `"{fname} {lname?}"`.
    fn pattern(&self) -> &str {
        ""
    }

    /// Number of positional parameters the handler expects when the pattern
    /// declares no placeholders. Each is filled with `""`.
    fn parameters(&self) -> usize {
        0
    }

    /// Handles one invocation.
    async fn handle(&self, api: &dyn BotApi, invocation: Invocation<'_>) -> anyhow::Result<()>;
}

/// A shared command handle.
pub type BoxedCommand = Arc<dyn Command>;
