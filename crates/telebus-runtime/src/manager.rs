//! Building and caching bots from configuration.
//!
//! ```text
//! TelebusConfig ──► BotManager::bot(name)
//!                      │  cached? ──► Arc<Bot>
//!                      ▼
//!           api_factory(&BotConfig) ──► Bot::with_suffix_matching
//!                      │
//!                      ├─ HelpCommand            (commands.help)
//!                      └─ catalog.create(key)    (resolve_command_keys)
//! ```
//!
//! Bots are built on first use and kept until [`BotManager::disconnect`] or
//! [`BotManager::reconnect`] drops them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use telebus_core::BoxedApi;
use telebus_framework::{CommandCatalog, HelpCommand};
use tracing::{debug, info};

use crate::bot::Bot;
use crate::config::{BotConfig, TelebusConfig, resolve_command_keys};
use crate::error::{RuntimeError, RuntimeResult};

/// Creates the Bot API handle for a configured bot.
pub type ApiFactory = Arc<dyn Fn(&BotConfig) -> BoxedApi + Send + Sync>;

/// Owns the configuration and the bots built from it.
pub struct BotManager {
    config: TelebusConfig,
    catalog: CommandCatalog,
    api_factory: ApiFactory,
    bots: RwLock<HashMap<String, Arc<Bot>>>,
}

impl BotManager {
    pub fn new<F>(config: TelebusConfig, catalog: CommandCatalog, api_factory: F) -> Self
    where
        F: Fn(&BotConfig) -> BoxedApi + Send + Sync + 'static,
    {
        Self {
            config,
            catalog,
            api_factory: Arc::new(api_factory),
            bots: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TelebusConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Returns the named bot, building it on first use.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::BotNotFound`] if no bot has that name
    /// - configuration or registration errors from building the bot
    pub fn bot(&self, name: &str) -> RuntimeResult<Arc<Bot>> {
        if let Some(bot) = self.bots.read().get(name) {
            return Ok(Arc::clone(bot));
        }

        let config = self
            .config
            .bot(name)
            .ok_or_else(|| RuntimeError::BotNotFound(name.to_string()))?;
        let built = Arc::new(self.build_bot(config)?);

        // Another caller may have finished first; keep whichever landed.
        let mut bots = self.bots.write();
        let bot = bots.entry(name.to_string()).or_insert(built);
        Ok(Arc::clone(bot))
    }

    /// Returns the bot named by `default_bot`.
    pub fn default_bot(&self) -> RuntimeResult<Arc<Bot>> {
        self.bot(&self.config.default_bot)
    }

    /// Drops the cached instance, if any, and builds a fresh one.
    pub fn reconnect(&self, name: &str) -> RuntimeResult<Arc<Bot>> {
        self.disconnect(name);
        self.bot(name)
    }

    /// Drops the cached instance. Returns `true` if one was cached.
    ///
    /// Holders of an `Arc<Bot>` keep their copy.
    pub fn disconnect(&self, name: &str) -> bool {
        let removed = self.bots.write().remove(name).is_some();
        if removed {
            info!(bot = %name, "Disconnected bot");
        }
        removed
    }

    /// Builds every configured bot, so configuration mistakes surface at
    /// startup instead of on first use.
    pub fn connect_all(&self) -> RuntimeResult<Vec<Arc<Bot>>> {
        self.config
            .bots
            .iter()
            .map(|bot| self.bot(&bot.name))
            .collect()
    }

    /// Names of all configured bots, in configuration order.
    pub fn bot_names(&self) -> Vec<&str> {
        self.config.bots.iter().map(|bot| bot.name.as_str()).collect()
    }

    /// Names of the bots currently built, sorted.
    pub fn connected(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bots.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Builds a bot without caching it.
    pub fn build_bot(&self, config: &BotConfig) -> RuntimeResult<Bot> {
        let api = (self.api_factory)(config);
        let mut bot = Bot::with_suffix_matching(
            config.name.clone(),
            api,
            self.config.commands.suffix_matching,
        );
        if let Some(username) = &config.username {
            bot.set_username(username.clone());
        }

        // Registered first so a catalog command named "help" replaces it.
        if self.config.commands.help {
            bot.add_command(HelpCommand)?;
        }

        let keys = resolve_command_keys(&self.config, config)?;
        for key in &keys {
            bot.add_shared_command(self.catalog.create(key)?)?;
        }

        debug!(bot = %config.name, commands = ?keys, "Built bot");
        Ok(bot)
    }
}

impl std::fmt::Debug for BotManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotManager")
            .field("bots", &self.bot_names())
            .field("connected", &self.connected())
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::FutureExt;
    use serde_json::Value;
    use telebus_core::{ApiResult, BotApi};
    use telebus_framework::{RegistrationError, command};

    use super::*;
    use crate::config::ConfigError;

    struct NullApi;

    #[async_trait]
    impl BotApi for NullApi {
        async fn call_api(&self, _method: &str, _params: Value) -> ApiResult<Value> {
            Ok(Value::Bool(true))
        }
    }

    fn catalog() -> CommandCatalog {
        CommandCatalog::new()
            .with("start", || {
                Arc::new(command("start").handler(|_api, _inv| async { Ok(()) }.boxed()))
            })
            .with("ban", || {
                Arc::new(command("ban").handler(|_api, _inv| async { Ok(()) }.boxed()))
            })
    }

    fn config() -> TelebusConfig {
        let mut main = BotConfig::new("main", "1:a");
        main.commands = vec!["start".into(), "admin".into()];
        let mut other = BotConfig::new("other", "2:b");
        other.username = Some("OtherBot".into());

        let mut config = TelebusConfig {
            bots: vec![main, other],
            ..Default::default()
        };
        config
            .commands
            .groups
            .insert("admin".into(), vec!["ban".into()]);
        config
    }

    fn manager(config: TelebusConfig, built: Arc<AtomicUsize>) -> BotManager {
        BotManager::new(config, catalog(), move |_config| {
            built.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullApi)
        })
    }

    fn names(bot: &Bot) -> Vec<String> {
        bot.commands().iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_builds_configured_commands() {
        let manager = manager(config(), Arc::default());
        let bot = manager.default_bot().unwrap();

        assert_eq!(bot.name(), "main");
        assert_eq!(names(&bot), ["ban", "help", "start"]);
    }

    #[test]
    fn test_bot_is_cached() {
        let built = Arc::new(AtomicUsize::new(0));
        let manager = manager(config(), built.clone());

        let first = manager.bot("main").unwrap();
        let second = manager.bot("main").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(manager.connected(), ["main"]);
    }

    #[test]
    fn test_reconnect_builds_fresh_instance() {
        let built = Arc::new(AtomicUsize::new(0));
        let manager = manager(config(), built.clone());

        let first = manager.bot("main").unwrap();
        let second = manager.reconnect("main").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_username_from_config() {
        let manager = manager(config(), Arc::default());
        let bot = manager.bot("other").unwrap();
        assert_eq!(bot.username(), Some("OtherBot"));
        assert_eq!(names(&bot), ["help"]);
    }

    #[test]
    fn test_unknown_bot() {
        let manager = manager(config(), Arc::default());
        assert!(matches!(
            manager.bot("ghost"),
            Err(RuntimeError::BotNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_unknown_command_key() {
        let mut config = config();
        config.commands.shared.push("missing".into());
        let manager = manager(config, Arc::default());

        let err = manager.connect_all().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Command(telebus_framework::CommandError::Registration(
                RegistrationError::UnknownCommand(_)
            ))
        ));
        assert!(manager.connected().is_empty());
    }

    #[test]
    fn test_group_cycle_surfaces() {
        let mut config = config();
        config
            .commands
            .groups
            .insert("ban".into(), vec!["admin".into()]);
        let manager = manager(config, Arc::default());

        assert!(matches!(
            manager.bot("main"),
            Err(RuntimeError::Config(ConfigError::CommandGroupCycle { .. }))
        ));
    }

    #[test]
    fn test_help_disabled() {
        let mut config = config();
        config.commands.help = false;
        let manager = manager(config, Arc::default());
        assert_eq!(names(&manager.bot("main").unwrap()), ["ban", "start"]);
    }
}
