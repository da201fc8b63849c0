//! Name and alias bookkeeping for a [`CommandBus`](crate::CommandBus).
//!
//! # Invariants
//!
//! - Command names and aliases are disjoint sets.
//! - Every alias points at exactly one registered command.
//! - Registration is all-or-nothing: every check runs before either map is
//!   touched, so a rejected command leaves the registry exactly as it was.
//!
//! Re-registering a name replaces the previous command (last write wins).
//! The replaced command's aliases are released first, and removing a command
//! releases its aliases too.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::command::BoxedCommand;
use crate::error::{RegistrationError, RegistrationResult};
use crate::pattern::{CommandPattern, SuffixMatching};

/// Name of the command used as fallback for unknown names.
pub const HELP_COMMAND: &str = "help";

/// A command together with its compiled argument pattern.
#[derive(Clone)]
pub struct RegisteredCommand {
    command: BoxedCommand,
    pattern: CommandPattern,
}

impl RegisteredCommand {
    pub fn command(&self) -> &BoxedCommand {
        &self.command
    }

    pub fn pattern(&self) -> &CommandPattern {
        &self.pattern
    }
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.command.name())
            .field("aliases", &self.command.aliases())
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// How a name was resolved to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The name is a registered command name.
    Name,
    /// The name is an alias.
    Alias,
    /// Nothing matched; the `help` command answers instead.
    Fallback,
}

/// Registry of commands and aliases.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    suffix: SuffixMatching,
    commands: HashMap<String, RegisteredCommand>,
    /// alias -> owning command name
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new(suffix: SuffixMatching) -> Self {
        Self {
            suffix,
            commands: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Returns how `@botname` suffixes are matched in argument patterns.
    pub fn suffix_matching(&self) -> SuffixMatching {
        self.suffix
    }

    /// Registers a command.
    ///
    /// # Errors
    ///
    /// Fails without modifying the registry when the name or an alias is
    /// malformed, when an alias collides with a command name or another
    /// alias, when the name collides with another command's alias, or when
    /// the argument pattern does not compile.
    pub fn insert(&mut self, command: BoxedCommand) -> RegistrationResult<()> {
        let name = command.name().to_string();
        validate_name(&name)?;

        if let Some(owner) = self.aliases.get(&name)
            && *owner != name
        {
            return Err(RegistrationError::NameCollidesWithAlias {
                name,
                command: owner.clone(),
            });
        }

        let mut seen = HashSet::new();
        for alias in command.aliases() {
            validate_name(alias)?;

            if *alias == name || self.commands.contains_key(alias) {
                return Err(RegistrationError::AliasCollidesWithName {
                    alias: alias.clone(),
                    command: alias.clone(),
                });
            }
            if !seen.insert(alias.as_str()) {
                return Err(RegistrationError::AliasCollidesWithAlias {
                    alias: alias.clone(),
                    command: name,
                });
            }
            // Aliases owned by the command being replaced are released below.
            if let Some(owner) = self.aliases.get(alias)
                && *owner != name
            {
                return Err(RegistrationError::AliasCollidesWithAlias {
                    alias: alias.clone(),
                    command: owner.clone(),
                });
            }
        }

        let mut names: Vec<&str> = vec![name.as_str()];
        names.extend(command.aliases().iter().map(String::as_str));
        let pattern =
            CommandPattern::compile(&names, command.pattern(), self.suffix).map_err(|e| {
                RegistrationError::InvalidPattern {
                    command: name.clone(),
                    reason: e.to_string(),
                }
            })?;

        if self.commands.contains_key(&name) {
            debug!(command = %name, "Replacing previously registered command");
            self.release_aliases(&name);
        }

        for alias in command.aliases() {
            self.aliases.insert(alias.clone(), name.clone());
        }
        debug!(
            command = %name,
            aliases = ?command.aliases(),
            pattern = %pattern,
            "Registered command"
        );
        self.commands
            .insert(name, RegisteredCommand { command, pattern });

        Ok(())
    }

    /// Removes a command and every alias pointing at it.
    pub fn remove(&mut self, name: &str) -> Option<BoxedCommand> {
        let removed = self.commands.remove(name)?;
        self.release_aliases(name);
        debug!(command = %name, "Removed command");
        Some(removed.command)
    }

    fn release_aliases(&mut self, name: &str) {
        self.aliases.retain(|_, owner| owner != name);
    }

    /// Looks up a command by its name only.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(name)
    }

    /// Returns the command name an alias points at.
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Resolves a parsed name: command name, then alias, then `help`.
    pub fn resolve(&self, name: &str) -> Option<(&RegisteredCommand, Resolution)> {
        if let Some(found) = self.commands.get(name) {
            return Some((found, Resolution::Name));
        }
        if let Some(found) = self.alias_target(name).and_then(|n| self.commands.get(n)) {
            return Some((found, Resolution::Alias));
        }
        self.commands
            .get(HELP_COMMAND)
            .map(|found| (found, Resolution::Fallback))
    }

    /// Returns `true` if `name` is a registered command name.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Returns all commands sorted by name.
    pub fn commands(&self) -> Vec<BoxedCommand> {
        let mut entries: Vec<&RegisteredCommand> = self.commands.values().collect();
        entries.sort_by(|a, b| a.command.name().cmp(b.command.name()));
        entries.into_iter().map(|e| e.command.clone()).collect()
    }

    /// Returns all command names sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Rejects names that could never appear as a `/command` token.
fn validate_name(name: &str) -> RegistrationResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('/') {
        "name must not include the leading '/'"
    } else if name.contains('@') {
        "name must not contain '@'"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else {
        return Ok(());
    };

    Err(RegistrationError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command;
    use futures::FutureExt;
    use std::sync::Arc;

    fn cmd(name: &str, aliases: &[&str]) -> BoxedCommand {
        Arc::new(
            command(name)
                .aliases(aliases.iter().copied())
                .handler(|_api, _inv| async { Ok(()) }.boxed()),
        )
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::new(SuffixMatching::Strict)
    }

    #[test]
    fn test_insert_and_resolve() {
        let mut reg = registry();
        reg.insert(cmd("start", &["begin"])).unwrap();

        let (found, how) = reg.resolve("start").unwrap();
        assert_eq!(found.command().name(), "start");
        assert_eq!(how, Resolution::Name);

        let (found, how) = reg.resolve("begin").unwrap();
        assert_eq!(found.command().name(), "start");
        assert_eq!(how, Resolution::Alias);

        assert!(reg.resolve("unknown").is_none());
    }

    #[test]
    fn test_help_fallback() {
        let mut reg = registry();
        reg.insert(cmd("help", &[])).unwrap();

        let (found, how) = reg.resolve("nope").unwrap();
        assert_eq!(found.command().name(), "help");
        assert_eq!(how, Resolution::Fallback);
    }

    #[test]
    fn test_same_name_last_write_wins() {
        let mut reg = registry();
        let first = cmd("start", &[]);
        let second = cmd("start", &[]);
        reg.insert(first.clone()).unwrap();
        reg.insert(second.clone()).unwrap();

        assert_eq!(reg.len(), 1);
        assert!(Arc::ptr_eq(reg.get("start").unwrap().command(), &second));
    }

    #[test]
    fn test_replacement_releases_old_aliases() {
        let mut reg = registry();
        reg.insert(cmd("start", &["s", "go"])).unwrap();
        reg.insert(cmd("start", &["s"])).unwrap();

        assert_eq!(reg.alias_target("s"), Some("start"));
        assert_eq!(reg.alias_target("go"), None);
    }

    #[test]
    fn test_alias_collides_with_existing_name() {
        let mut reg = registry();
        reg.insert(cmd("start", &[])).unwrap();

        let err = reg.insert(cmd("other", &["start"])).unwrap_err();
        assert!(matches!(err, RegistrationError::AliasCollidesWithName { .. }));
        assert!(!reg.contains("other"));
    }

    #[test]
    fn test_alias_collides_with_existing_alias_is_atomic() {
        let mut reg = registry();
        reg.insert(cmd("start", &["s"])).unwrap();

        let err = reg.insert(cmd("stop", &["halt", "s"])).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::AliasCollidesWithAlias {
                alias: "s".into(),
                command: "start".into()
            }
        );
        // Nothing from the rejected command was committed.
        assert!(!reg.contains("stop"));
        assert_eq!(reg.alias_target("halt"), None);
        assert_eq!(reg.alias_target("s"), Some("start"));
    }

    #[test]
    fn test_alias_equal_to_own_name() {
        let mut reg = registry();
        let err = reg.insert(cmd("start", &["start"])).unwrap_err();
        assert!(matches!(err, RegistrationError::AliasCollidesWithName { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_duplicate_alias_in_own_list() {
        let mut reg = registry();
        let err = reg.insert(cmd("start", &["s", "s"])).unwrap_err();
        assert!(matches!(err, RegistrationError::AliasCollidesWithAlias { .. }));
    }

    #[test]
    fn test_name_collides_with_existing_alias() {
        let mut reg = registry();
        reg.insert(cmd("start", &["go"])).unwrap();

        let err = reg.insert(cmd("go", &[])).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::NameCollidesWithAlias {
                name: "go".into(),
                command: "start".into()
            }
        );
    }

    #[test]
    fn test_remove_purges_aliases() {
        let mut reg = registry();
        reg.insert(cmd("start", &["s"])).unwrap();

        assert!(reg.remove("start").is_some());
        assert!(reg.resolve("s").is_none());
        assert!(reg.remove("start").is_none());

        // The alias is free again.
        reg.insert(cmd("stop", &["s"])).unwrap();
    }

    #[test]
    fn test_invalid_names() {
        let mut reg = registry();
        for bad in ["", "/start", "a b", "x@bot"] {
            let err = reg.insert(cmd(bad, &[])).unwrap_err();
            assert!(matches!(err, RegistrationError::InvalidName { .. }), "{bad}");
        }
        let err = reg.insert(cmd("ok", &["not ok"])).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidName { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let mut reg = registry();
        let bad = Arc::new(
            command("calc")
                .pattern("(unclosed")
                .handler(|_api, _inv| async { Ok(()) }.boxed()),
        );
        let err = reg.insert(bad).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPattern { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_commands_sorted_by_name() {
        let mut reg = registry();
        reg.insert(cmd("zeta", &[])).unwrap();
        reg.insert(cmd("alpha", &[])).unwrap();

        let names: Vec<String> = reg
            .commands()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(reg.names(), ["alpha", "zeta"]);
    }
}
