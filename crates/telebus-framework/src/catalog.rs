//! Factories for commands referenced by key.
//!
//! Configuration files name commands by string. The catalog maps each key to
//! a factory closure supplied by the application, so building a bot from
//! config never needs reflection.
//!
//! ```rust,ignore
//! let mut catalog = CommandCatalog::new();
//! catalog.register("help", || Arc::new(HelpCommand));
//! catalog.register("start", || Arc::new(StartCommand::default()));
//!
//! let help = catalog.create("help")?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::command::BoxedCommand;
use crate::error::{RegistrationError, RegistrationResult};

/// Builds a fresh command instance.
pub type CommandFactory = Arc<dyn Fn() -> BoxedCommand + Send + Sync>;

/// Key to factory mapping.
#[derive(Clone, Default)]
pub struct CommandCatalog {
    factories: BTreeMap<String, CommandFactory>,
}

impl CommandCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `key`, replacing any previous one.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> BoxedCommand + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> BoxedCommand + Send + Sync + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Builds the command registered under `key`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UnknownCommand`] if nothing is registered there.
    pub fn create(&self, key: &str) -> RegistrationResult<BoxedCommand> {
        self.factories
            .get(key)
            .map(|factory| factory())
            .ok_or_else(|| RegistrationError::UnknownCommand(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Returns the registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for CommandCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandCatalog")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::help::HelpCommand;

    #[test]
    fn test_create_registered() {
        let catalog = CommandCatalog::new().with("help", || Arc::new(HelpCommand));

        let first = catalog.create("help").unwrap();
        let second = catalog.create("help").unwrap();
        assert_eq!(first.name(), "help");
        // Every call builds a new instance.
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_key() {
        let catalog = CommandCatalog::new();
        let err = catalog.create("missing").err().unwrap();
        assert_eq!(
            err,
            RegistrationError::UnknownCommand("missing".into())
        );
    }

    #[test]
    fn test_keys_sorted() {
        let mut catalog = CommandCatalog::new();
        catalog
            .register("start", || Arc::new(HelpCommand))
            .register("about", || Arc::new(HelpCommand));
        assert_eq!(catalog.keys().collect::<Vec<_>>(), ["about", "start"]);
        assert!(catalog.contains("about"));
        assert_eq!(catalog.len(), 2);
    }
}
