//! The command bus: registration plus dispatch.
//!
//! ```text
//! Update ──► message.entities ──► bot_command? ──► CommandParser::parse
//!                                                        │
//!                         ┌──────────────────────────────┘
//!                         ▼
//!              registry.resolve(name)  name ─► alias ─► "help" ─► (skip)
//!                         │
//!                         ▼
//!          pattern.extract(text @ entity offset) ──► Invocation
//!                         │
//!                         ▼
//!                 command.handle(api, invocation)
//! ```
//!
//! Entities are processed in message order, one at a time. A failing handler
//! is logged and recorded in the [`DispatchReport`]; it never stops the
//! remaining entities of the same message.

use telebus_core::{BotApi, Message, MessageEntity, Update, utf16_to_byte_index};
use tracing::{Instrument, debug, debug_span, error, trace};

use crate::command::{BoxedCommand, Command, Invocation};
use crate::error::{CommandError, CommandResult, ParseError, RegistrationResult};
use crate::parser::CommandParser;
use crate::pattern::SuffixMatching;
use crate::registry::{CommandRegistry, Resolution};

/// Outcome of running one command.
#[derive(Debug)]
pub enum Execution {
    /// No command, alias or `help` fallback matched the name.
    Unresolved,
    /// The handler returned `Ok`.
    Completed {
        /// Registered name of the command that ran.
        command: String,
    },
    /// The handler returned an error.
    Failed {
        /// Registered name of the command that ran.
        command: String,
        /// The handler's error.
        error: anyhow::Error,
    },
}

impl Execution {
    /// Returns `true` when some command ran, whatever its result.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Returns the registered name of the command that ran.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Unresolved => None,
            Self::Completed { command } | Self::Failed { command, .. } => Some(command),
        }
    }
}

/// Summary of one [`CommandBus::handler`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands whose handler completed, in message order.
    pub invoked: Vec<String>,
    /// Commands whose handler returned an error, in message order.
    pub failed: Vec<String>,
    /// Parsed names nothing answered to.
    pub unresolved: Vec<String>,
}

impl DispatchReport {
    /// Returns `true` if no command ran at all.
    pub fn is_empty(&self) -> bool {
        self.invoked.is_empty() && self.failed.is_empty()
    }

    /// Number of handlers that ran, successful or not.
    pub fn dispatched(&self) -> usize {
        self.invoked.len() + self.failed.len()
    }

    fn record(&mut self, name: String, execution: Execution) {
        match execution {
            Execution::Unresolved => self.unresolved.push(name),
            Execution::Completed { command } => self.invoked.push(command),
            Execution::Failed { command, .. } => self.failed.push(command),
        }
    }
}

/// Registry and dispatcher for one bot's commands.
///
/// A bus is an ordinary value owned by whoever runs the bot. Build it, add
/// commands at startup, then share it read-only (e.g. behind an `Arc`) with
/// the code that feeds it updates.
///
/// # Example
///
/// ```rust,ignore
/// let mut bus = CommandBus::new();
/// bus.add_command(HelpCommand)?;
/// bus.add_command(command("start").handler(|api, inv| /* ... */))?;
///
/// let report = bus.handler(api.as_ref(), &update).await?;
/// ```
#[derive(Debug, Default)]
pub struct CommandBus {
    registry: CommandRegistry,
}

impl CommandBus {
    /// Creates an empty bus with strict `@botname` matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bus with the given `@botname` matching mode.
    pub fn with_suffix_matching(suffix: SuffixMatching) -> Self {
        Self {
            registry: CommandRegistry::new(suffix),
        }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Registers a command.
    pub fn add_command<C>(&mut self, command: C) -> RegistrationResult<()>
    where
        C: Command + 'static,
    {
        self.registry.insert(std::sync::Arc::new(command))
    }

    /// Registers an already shared command.
    pub fn add_shared_command(&mut self, command: BoxedCommand) -> RegistrationResult<()> {
        self.registry.insert(command)
    }

    /// Registers several commands, stopping at the first failure.
    ///
    /// Commands before the failing one stay registered.
    pub fn add_commands<I>(&mut self, commands: I) -> RegistrationResult<()>
    where
        I: IntoIterator<Item = BoxedCommand>,
    {
        commands
            .into_iter()
            .try_for_each(|command| self.registry.insert(command))
    }

    /// Removes a command and its aliases.
    pub fn remove_command(&mut self, name: &str) -> Option<BoxedCommand> {
        self.registry.remove(name)
    }

    /// Removes several commands. Unknown names are ignored.
    pub fn remove_commands<'n, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'n str>,
    {
        for name in names {
            self.registry.remove(name);
        }
    }

    /// Returns all registered commands sorted by name.
    pub fn commands(&self) -> Vec<BoxedCommand> {
        self.registry.commands()
    }

    /// Dispatches every `bot_command` entity of `update`.
    ///
    /// Updates without a message, or whose message has no command entity,
    /// are a no-op and produce an empty report.
    ///
    /// Every entity is read before any handler runs, so an input error
    /// leaves no side effects behind.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when an entity cannot be read from the
    /// message text. Handler failures are not errors here; they end up in
    /// [`DispatchReport::failed`].
    pub async fn handler(&self, api: &dyn BotApi, update: &Update) -> CommandResult<DispatchReport> {
        let mut report = DispatchReport::default();
        let Some(message) = update.message() else {
            trace!(update_id = update.update_id, "Update carries no message");
            return Ok(report);
        };

        let span = debug_span!("dispatch", update_id = update.update_id);
        async {
            let text = message.text();
            let parsed = message
                .bot_commands()
                .map(|entity| {
                    let name = CommandParser::parse(text, entity.offset, entity.length)?;
                    let byte_offset = entity_start(text, entity)?;
                    Ok::<_, ParseError>((name, entity, byte_offset))
                })
                .collect::<Result<Vec<_>, ParseError>>()?;

            for (name, entity, byte_offset) in parsed {
                let execution = self.run(api, &name, update, entity, byte_offset).await;
                report.record(name, execution);
            }
            Ok::<_, CommandError>(report)
        }
        .instrument(span)
        .await
    }

    /// Resolves `name` and runs the command for one entity of `update`.
    ///
    /// Resolution tries the command names, then aliases, then `help`.
    pub async fn execute(
        &self,
        api: &dyn BotApi,
        name: &str,
        update: &Update,
        entity: &MessageEntity,
    ) -> CommandResult<Execution> {
        let text = update.message().map(Message::text).unwrap_or_default();
        let byte_offset = entity_start(text, entity)?;
        Ok(self.run(api, name, update, entity, byte_offset).await)
    }

    /// Runs one already validated entity. `byte_offset` is where the entity
    /// starts in the message text.
    async fn run(
        &self,
        api: &dyn BotApi,
        name: &str,
        update: &Update,
        entity: &MessageEntity,
        byte_offset: usize,
    ) -> Execution {
        let Some((registered, resolution)) = self.registry.resolve(name) else {
            debug!(command = %name, "No command, alias or help fallback for name");
            return Execution::Unresolved;
        };
        let command = registered.command();
        if resolution == Resolution::Fallback {
            debug!(command = %name, "Unknown command, falling back to help");
        }

        let text = update.message().map(Message::text).unwrap_or_default();
        let arguments = registered
            .pattern()
            .extract(text, byte_offset, command.parameters());

        debug!(
            command = %command.name(),
            invoked_as = %name,
            arguments = ?arguments,
            "Executing command"
        );
        let invocation = Invocation::new(self, update, entity, name, arguments);
        let outcome = command.handle(api, invocation).await;

        let command = command.name().to_string();
        match outcome {
            Ok(()) => Execution::Completed { command },
            Err(error) => {
                error!(command = %command, error = %error, "Command handler failed");
                Execution::Failed { command, error }
            }
        }
    }
}

/// Byte index of the entity's first character in `text`.
fn entity_start(text: &str, entity: &MessageEntity) -> Result<usize, ParseError> {
    utf16_to_byte_index(text, entity.offset).ok_or(ParseError::EntityOutOfBounds {
        offset: entity.offset,
        length: entity.length,
    })
}
