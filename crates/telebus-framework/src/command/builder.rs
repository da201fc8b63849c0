use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use telebus_core::BotApi;

use super::{Command, Invocation};

/// Type of the async closure stored inside a [`FnCommand`].
pub type HandlerFn = Arc<
    dyn for<'a> Fn(&'a dyn BotApi, Invocation<'a>) -> BoxFuture<'a, anyhow::Result<()>>
        + Send
        + Sync,
>;

/// Starts building a closure-backed command.
///
/// # Arguments
///
/// - `name`: the command name without "/" (e.g. `"echo"` matches `/echo`)
///
/// # Example
///
/// ```rust,ignore
/// let echo = command("echo")
///     .pattern("{text}")
///     .handler(|api, inv| {
///         async move {
///             inv.reply_with_message(api, inv.arg("text").unwrap_or_default()).await?;
///             Ok(())
///         }
///         .boxed()
///     });
/// bus.add_command(echo)?;
/// ```
pub fn command(name: impl Into<String>) -> CommandBuilder {
    CommandBuilder::new(name)
}

/// Builder produced by [`command`]. Finalise with `.handler(f)`.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    pattern: String,
    parameters: usize,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            pattern: String::new(),
            parameters: 0,
        }
    }

    /// Adds one alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Declares how many blank positional arguments a placeholder-free
    /// pattern should still produce.
    pub fn parameters(mut self, count: usize) -> Self {
        self.parameters = count;
        self
    }

    /// Attaches the handler and produces the command.
    pub fn handler<F>(self, handler: F) -> FnCommand
    where
        F: for<'a> Fn(&'a dyn BotApi, Invocation<'a>) -> BoxFuture<'a, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        FnCommand {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            pattern: self.pattern,
            parameters: self.parameters,
            handler: Arc::new(handler),
        }
    }
}

/// A command whose behaviour is an async closure.
#[derive(Clone)]
pub struct FnCommand {
    name: String,
    aliases: Vec<String>,
    description: String,
    pattern: String,
    parameters: usize,
    handler: HandlerFn,
}

impl std::fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Command for FnCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn parameters(&self) -> usize {
        self.parameters
    }

    async fn handle(&self, api: &dyn BotApi, invocation: Invocation<'_>) -> anyhow::Result<()> {
        (self.handler)(api, invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_builder_fields() {
        let cmd = command("demo")
            .alias("d")
            .aliases(["dm", "dem"])
            .description("A demo")
            .pattern("{a} {b?}")
            .parameters(2)
            .handler(|_api, _inv| async { Ok(()) }.boxed());

        assert_eq!(cmd.name(), "demo");
        assert_eq!(cmd.aliases(), ["d", "dm", "dem"]);
        assert_eq!(cmd.description(), "A demo");
        assert_eq!(cmd.pattern(), "{a} {b?}");
        assert_eq!(cmd.parameters(), 2);
    }

    #[test]
    fn test_builder_defaults() {
        let cmd = command("start").handler(|_api, _inv| async { Ok(()) }.boxed());
        assert!(cmd.aliases().is_empty());
        assert_eq!(cmd.description(), "");
        assert_eq!(cmd.pattern(), "");
        assert_eq!(cmd.parameters(), 0);
    }
}
