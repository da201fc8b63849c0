//! # Telebus Framework
//!
//! Command parsing, registration and dispatch for Telegram bots.
//!
//! This layer provides:
//! - [`CommandParser`] for reading `/name@BotName` tokens out of message text
//! - [`CommandPattern`], the `{placeholder}` argument DSL
//! - The [`Command`] trait and the [`command`] closure builder
//! - [`CommandBus`], an explicitly owned registry and dispatcher
//! - [`CommandsProcessor`] for callers that want names without dispatch
//! - [`CommandCatalog`] for building commands from configuration keys
//! - [`BusService`] for composing dispatch with tower middleware
//!
//! ```text
//! Update ─► CommandBus::handler ─► parse ─► resolve ─► extract ─► Command::handle
//! ```

pub mod bus;
pub mod catalog;
pub mod command;
pub mod error;
pub mod help;
pub mod parser;
pub mod pattern;
pub mod processor;
pub mod registry;
pub mod service;

pub use bus::{CommandBus, DispatchReport, Execution};
pub use catalog::{CommandCatalog, CommandFactory};
pub use command::{
    BoxedCommand, Command, CommandArgs, CommandBuilder, FnCommand, HandlerFn, Invocation, command,
};
pub use error::{
    CommandError, CommandResult, ParseError, RegistrationError, RegistrationResult,
};
pub use help::HelpCommand;
pub use parser::CommandParser;
pub use pattern::{CommandPattern, SuffixMatching};
pub use processor::CommandsProcessor;
pub use registry::{CommandRegistry, HELP_COMMAND, RegisteredCommand, Resolution};
pub use service::BusService;

/// Prelude for common imports.
pub mod prelude {
    pub use super::bus::{CommandBus, DispatchReport, Execution};
    pub use super::catalog::CommandCatalog;
    pub use super::command::{BoxedCommand, Command, CommandArgs, Invocation, command};
    pub use super::error::{CommandError, CommandResult, RegistrationError};
    pub use super::help::HelpCommand;
    pub use super::pattern::SuffixMatching;
    pub use super::processor::CommandsProcessor;
    pub use futures::FutureExt;
}
