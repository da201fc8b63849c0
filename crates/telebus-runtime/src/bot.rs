//! A configured bot: an API handle plus its own command bus.

use telebus_core::{BotCommand, BoxedApi, Update};
use telebus_framework::{
    BoxedCommand, Command, CommandBus, CommandResult, DispatchReport, RegistrationResult,
    SuffixMatching,
};
use tracing::{debug, info};

use crate::error::RuntimeResult;

/// One bot instance.
///
/// The bot owns its [`CommandBus`]; command management goes through the
/// delegating methods below, or through [`command_bus`](Self::command_bus)
/// for anything else.
pub struct Bot {
    name: String,
    username: Option<String>,
    api: BoxedApi,
    bus: CommandBus,
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl Bot {
    /// Creates a bot with an empty, strictly matching bus.
    pub fn new(name: impl Into<String>, api: BoxedApi) -> Self {
        Self::with_bus(name, api, CommandBus::new())
    }

    /// Creates a bot around an existing bus.
    pub fn with_bus(name: impl Into<String>, api: BoxedApi, bus: CommandBus) -> Self {
        let username = api.username().map(str::to_string);
        Self {
            name: name.into(),
            username,
            api,
            bus,
        }
    }

    /// Creates a bot whose bus uses the given `@botname` matching.
    pub fn with_suffix_matching(
        name: impl Into<String>,
        api: BoxedApi,
        suffix: SuffixMatching,
    ) -> Self {
        Self::with_bus(name, api, CommandBus::with_suffix_matching(suffix))
    }

    /// Overrides the username reported by the API handle.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn api(&self) -> &BoxedApi {
        &self.api
    }

    pub fn command_bus(&self) -> &CommandBus {
        &self.bus
    }

    pub fn command_bus_mut(&mut self) -> &mut CommandBus {
        &mut self.bus
    }

    pub fn add_command<C>(&mut self, command: C) -> RegistrationResult<()>
    where
        C: Command + 'static,
    {
        self.bus.add_command(command)
    }

    pub fn add_shared_command(&mut self, command: BoxedCommand) -> RegistrationResult<()> {
        self.bus.add_shared_command(command)
    }

    pub fn add_commands<I>(&mut self, commands: I) -> RegistrationResult<()>
    where
        I: IntoIterator<Item = BoxedCommand>,
    {
        self.bus.add_commands(commands)
    }

    pub fn remove_command(&mut self, name: &str) -> Option<BoxedCommand> {
        self.bus.remove_command(name)
    }

    pub fn remove_commands<'n, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'n str>,
    {
        self.bus.remove_commands(names)
    }

    /// Returns all registered commands sorted by name.
    pub fn commands(&self) -> Vec<BoxedCommand> {
        self.bus.commands()
    }

    /// Dispatches the commands of one update.
    pub async fn handle_update(&self, update: &Update) -> CommandResult<DispatchReport> {
        debug!(
            bot = %self.name,
            update_id = update.update_id,
            kind = %update.kind(),
            "Handling update"
        );
        self.bus.handler(self.api.as_ref(), update).await
    }

    /// Dispatches updates one after another, in order.
    ///
    /// Stops at the first update that fails to parse.
    pub async fn handle_updates(&self, updates: &[Update]) -> CommandResult<Vec<DispatchReport>> {
        let mut reports = Vec::with_capacity(updates.len());
        for update in updates {
            reports.push(self.handle_update(update).await?);
        }
        Ok(reports)
    }

    /// Decodes a webhook request body and dispatches it.
    pub async fn handle_webhook_body(&self, body: &str) -> RuntimeResult<DispatchReport> {
        let update: Update = serde_json::from_str(body)?;
        Ok(self.handle_update(&update).await?)
    }

    /// Publishes the registered commands to Telegram with `setMyCommands`.
    ///
    /// Telegram rejects empty descriptions, so a command without one is
    /// listed under its own name.
    pub async fn sync_commands(&self) -> RuntimeResult<bool> {
        let commands: Vec<BotCommand> = self
            .commands()
            .iter()
            .map(|command| {
                let description = match command.description() {
                    "" => command.name(),
                    description => description,
                };
                BotCommand::new(command.name(), description)
            })
            .collect();

        let ok = self.api.set_my_commands(&commands).await?;
        info!(bot = %self.name, count = commands.len(), "Published command list");
        Ok(ok)
    }
}
