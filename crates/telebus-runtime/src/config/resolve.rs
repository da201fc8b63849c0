//! Expansion of command references into catalog keys.
//!
//! A bot's command list mixes catalog keys and group names:
//!
//! ```text
//! shared = ["about"]
//! groups = { admin = ["ban", "moderation"], moderation = ["mute"] }
//! bot.commands = ["start", "admin"]
//!
//! => ["about", "start", "ban", "mute"]
//! ```
//!
//! Shared keys come first, groups expand in place, and a key listed more
//! than once keeps its first position.

use std::collections::{HashMap, HashSet};

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, TelebusConfig};

/// Returns the catalog keys `bot` should register, in registration order.
///
/// # Errors
///
/// [`ConfigError::CommandGroupCycle`] when a group includes itself.
pub fn resolve_command_keys(config: &TelebusConfig, bot: &BotConfig) -> ConfigResult<Vec<String>> {
    let groups = &config.commands.groups;
    let mut keys = Vec::new();

    for entry in config.commands.shared.iter().chain(&bot.commands) {
        expand(entry, groups, &mut Vec::new(), &mut keys)?;
    }

    let mut seen = HashSet::new();
    keys.retain(|key| seen.insert(key.clone()));
    Ok(keys)
}

/// Expands every group once to reject cycles up front.
pub(crate) fn check_groups(groups: &HashMap<String, Vec<String>>) -> ConfigResult<()> {
    let mut sink = Vec::new();
    for group in groups.keys() {
        expand(group, groups, &mut Vec::new(), &mut sink)?;
        sink.clear();
    }
    Ok(())
}

fn expand<'g>(
    entry: &'g str,
    groups: &'g HashMap<String, Vec<String>>,
    path: &mut Vec<&'g str>,
    out: &mut Vec<String>,
) -> ConfigResult<()> {
    let Some(members) = groups.get(entry) else {
        out.push(entry.to_string());
        return Ok(());
    };

    if path.contains(&entry) {
        path.push(entry);
        return Err(ConfigError::CommandGroupCycle {
            group: entry.to_string(),
            path: path.join(" -> "),
        });
    }

    path.push(entry);
    for member in members {
        expand(member, groups, path, out)?;
    }
    path.pop();
    Ok(())
}
