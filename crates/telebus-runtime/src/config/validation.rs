//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::resolve::check_groups;
use super::schema::{BotConfig, LogOutput, TelebusConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &TelebusConfig) -> ConfigResult<()> {
    validate_logging_config(config)?;
    validate_bots_config(config)?;
    check_groups(&config.commands.groups)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(config: &TelebusConfig) -> ConfigResult<()> {
    let logging = &config.logging;

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Log filter module name cannot be blank: {module:?}"
        )));
    }

    Ok(())
}

/// Validates all bot configurations.
fn validate_bots_config(config: &TelebusConfig) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for bot in &config.bots {
        if !seen.insert(bot.name.as_str()) {
            return Err(ConfigError::DuplicateBot(bot.name.clone()));
        }
        validate_bot_config(bot)?;
    }

    if !config.bots.is_empty() && !seen.contains(config.default_bot.as_str()) {
        return Err(ConfigError::UnknownDefaultBot(config.default_bot.clone()));
    }

    Ok(())
}

/// Validates a single bot configuration.
fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.name.is_empty() {
        return Err(ConfigError::missing_field("bot.name"));
    }

    if bot.name.contains(' ') {
        return Err(ConfigError::validation("Bot name cannot contain spaces"));
    }

    if bot.token.trim().is_empty() {
        return Err(ConfigError::missing_field(format!(
            "bots.{}.token",
            bot.name
        )));
    }

    if let Some(username) = &bot.username
        && username.starts_with('@')
    {
        return Err(ConfigError::validation(format!(
            "Username of bot '{}' must not start with '@'",
            bot.name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(bots: Vec<BotConfig>) -> TelebusConfig {
        TelebusConfig {
            bots,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_empty_config() {
        let config = TelebusConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_bot() {
        let bot = BotConfig::new("main", "123:abc");
        let result = validate_config(&config_with(vec![bot.clone(), bot]));
        assert!(matches!(result, Err(ConfigError::DuplicateBot(name)) if name == "main"));
    }

    #[test]
    fn test_validate_missing_token() {
        let result = validate_config(&config_with(vec![BotConfig::new("main", " ")]));
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_validate_name_with_space() {
        let result = validate_config(&config_with(vec![BotConfig::new("my bot", "1:a")]));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_validate_unknown_default_bot() {
        let mut config = config_with(vec![BotConfig::new("secondary", "1:a")]);
        config.default_bot = "main".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::UnknownDefaultBot(_))
        ));
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = TelebusConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.logging.file_path = Some("telebus.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_group_cycle() {
        let mut config = TelebusConfig::default();
        config
            .commands
            .groups
            .insert("a".into(), vec!["b".into()]);
        config
            .commands
            .groups
            .insert("b".into(), vec!["a".into()]);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::CommandGroupCycle { .. })
        ));
    }
}
