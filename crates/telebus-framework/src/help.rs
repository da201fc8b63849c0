use async_trait::async_trait;
use telebus_core::BotApi;

use crate::command::{Command, Invocation};
use crate::registry::HELP_COMMAND;

/// Built-in `/help` command.
///
/// Replies with one `/name - description` line per registered command,
/// sorted by name. Because the bus falls back to `help` for unknown names,
/// registering it also answers mistyped commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

impl HelpCommand {
    /// Renders the command list for `bus`.
    pub fn render(bus: &crate::CommandBus) -> String {
        bus.commands()
            .iter()
            .map(|command| format!("/{} - {}", command.name(), command.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        HELP_COMMAND
    }

    fn description(&self) -> &str {
        "Help command, Get a list of commands"
    }

    async fn handle(&self, api: &dyn BotApi, invocation: Invocation<'_>) -> anyhow::Result<()> {
        let text = Self::render(invocation.bus());
        invocation.reply_with_message(api, &text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::CommandBus;
    use crate::command::command;

    #[test]
    fn test_render_sorted_lines() {
        let mut bus = CommandBus::new();
        bus.add_command(HelpCommand).unwrap();
        bus.add_command(
            command("start")
                .description("Start the bot")
                .handler(|_api, _inv| async { Ok(()) }.boxed()),
        )
        .unwrap();
        bus.add_command(command("about").handler(|_api, _inv| async { Ok(()) }.boxed()))
            .unwrap();

        assert_eq!(
            HelpCommand::render(&bus),
            "/about - \n/help - Help command, Get a list of commands\n/start - Start the bot"
        );
    }
}
