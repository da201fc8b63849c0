use telebus_core::{ApiError, ApiResult, BotApi, ChatAction, Message, MessageEntity, Update};

use super::CommandArgs;
use crate::bus::{CommandBus, Execution};
use crate::error::CommandResult;

/// Everything a handler needs to know about the current invocation.
///
/// A fresh `Invocation` is built for every dispatched entity and handed to
/// [`Command::handle`](super::Command::handle) by value. Commands never store
/// per-call state, so one command instance can serve concurrent updates.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    bus: &'a CommandBus,
    update: &'a Update,
    entity: &'a MessageEntity,
    invoked_as: &'a str,
    arguments: CommandArgs,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        bus: &'a CommandBus,
        update: &'a Update,
        entity: &'a MessageEntity,
        invoked_as: &'a str,
        arguments: CommandArgs,
    ) -> Self {
        Self {
            bus,
            update,
            entity,
            invoked_as,
            arguments,
        }
    }

    /// The bus that dispatched this invocation.
    pub fn bus(&self) -> &'a CommandBus {
        self.bus
    }

    /// The update being processed.
    pub fn update(&self) -> &'a Update {
        self.update
    }

    /// The message that carried the command, if any.
    pub fn message(&self) -> Option<&'a Message> {
        self.update.message()
    }

    /// The `bot_command` entity that triggered this invocation.
    pub fn entity(&self) -> &'a MessageEntity {
        self.entity
    }

    /// The name as typed by the user: the command name, an alias, or an
    /// unknown name when the help fallback answered.
    pub fn invoked_as(&self) -> &'a str {
        self.invoked_as
    }

    /// Arguments extracted at this entity's offset.
    pub fn arguments(&self) -> &CommandArgs {
        &self.arguments
    }

    /// Shorthand for `self.arguments().get(name)`.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.arguments.get(name)
    }

    /// The chat to reply to.
    pub fn chat_id(&self) -> Option<i64> {
        self.update.chat().map(|chat| chat.id)
    }

    /// Sends a text message to the chat this command came from.
    pub async fn reply_with_message(&self, api: &dyn BotApi, text: &str) -> ApiResult<Message> {
        let chat_id = self.require_chat()?;
        api.send_message(chat_id, text).await
    }

    /// Broadcasts a chat action to the chat this command came from.
    pub async fn reply_with_chat_action(
        &self,
        api: &dyn BotApi,
        action: ChatAction,
    ) -> ApiResult<bool> {
        let chat_id = self.require_chat()?;
        api.send_chat_action(chat_id, action).await
    }

    /// Runs another registered command for the same update and entity.
    ///
    /// Resolution follows the bus rules (name, alias, then `help`). The
    /// triggered command sees this invocation's update and entity.
    pub async fn trigger_command(&self, api: &dyn BotApi, name: &str) -> CommandResult<Execution> {
        self.bus.execute(api, name, self.update, self.entity).await
    }

    fn require_chat(&self) -> ApiResult<i64> {
        self.chat_id()
            .ok_or_else(|| ApiError::other("update has no chat to reply to"))
    }
}
