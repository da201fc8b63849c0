//! Echo Bot Example
//!
//! Runs a bot against a file of Telegram updates and prints every Bot API
//! call to the log instead of sending it over HTTP.
//!
//! ```text
//! updates.json ──► Bot::handle_update ──► CommandBus ──► Command ──► ConsoleApi
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot -- --updates updates.json
//! cargo run --package echo-bot -- --config telebus.toml --bot main
//! ```
//!
//! Without `--updates`, a few built-in sample updates are dispatched.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde_json::{Value, json};
use telebus::core::text::utf16_to_byte_index;
use telebus::prelude::*;
use telebus::runtime::config::{BotConfig, load_config};
use telebus::runtime::logging;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "echo-bot")]
#[command(about = "Dispatch Telegram updates through a console bot", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file. Defaults to the usual search paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file holding an array of updates.
    #[arg(short, long)]
    updates: Option<PathBuf>,

    /// Bot to run. Defaults to `default_bot`.
    #[arg(short, long)]
    bot: Option<String>,

    /// Publish the command list after dispatching.
    #[arg(long)]
    sync: bool,
}

// ============================================================================
// Console Bot API
// ============================================================================

/// A [`BotApi`] that logs calls and fakes Telegram's answers.
struct ConsoleApi {
    username: Option<String>,
    next_message_id: AtomicI64,
}

impl ConsoleApi {
    fn new(config: &BotConfig) -> Self {
        Self {
            username: config.username.clone(),
            next_message_id: AtomicI64::new(1000),
        }
    }
}

#[async_trait]
impl BotApi for ConsoleApi {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
        info!(method, %params, "Bot API call");
        match method {
            "sendMessage" => Ok(json!({
                "message_id": self.next_message_id.fetch_add(1, Ordering::Relaxed),
                "chat": { "id": params["chat_id"], "type": "private" },
                "text": params["text"],
            })),
            "sendChatAction" | "setMyCommands" => Ok(Value::Bool(true)),
            _ => Err(ApiError::other(format!("unsupported method: {method}"))),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Text following the command token, trimmed.
fn remainder<'a>(inv: &Invocation<'a>) -> &'a str {
    let Some(message) = inv.message() else {
        return "";
    };
    let text = message.text();
    let entity = inv.entity();
    utf16_to_byte_index(text, entity.offset + entity.length)
        .map(|end| text[end..].trim())
        .unwrap_or_default()
}

fn catalog() -> CommandCatalog {
    CommandCatalog::new()
        .with("start", || {
            Arc::new(
                command("start")
                    .description("Say hello")
                    .handler(|api, inv| {
                        async move {
                            inv.reply_with_message(api, "Hi! Send /echo <text> or /help.")
                                .await?;
                            Ok(())
                        }
                        .boxed()
                    }),
            )
        })
        .with("echo", || {
            Arc::new(
                command("echo")
                    .alias("say")
                    .description("Repeat the given text")
                    .handler(|api, inv| {
                        async move {
                            let text = match remainder(&inv) {
                                "" => "Nothing to echo.",
                                text => text,
                            };
                            inv.reply_with_message(api, text).await?;
                            Ok(())
                        }
                        .boxed()
                    }),
            )
        })
        .with("ping", || {
            Arc::new(
                command("ping")
                    .description("Check that the bot is alive")
                    .handler(|api, inv| {
                        async move {
                            inv.reply_with_chat_action(api, ChatAction::Typing).await?;
                            inv.reply_with_message(api, "pong").await?;
                            Ok(())
                        }
                        .boxed()
                    }),
            )
        })
        .with("greet", || {
            Arc::new(
                command("greet")
                    .description("Greet someone by name")
                    .pattern("{name?}")
                    .handler(|api, inv| {
                        async move {
                            let name = inv
                                .arg("name")
                                .filter(|name| !name.is_empty())
                                .unwrap_or("stranger");
                            inv.reply_with_message(api, &format!("Hello, {name}!")).await?;
                            Ok(())
                        }
                        .boxed()
                    }),
            )
        })
}

// ============================================================================
// Setup
// ============================================================================

fn load(cli: &Cli) -> Result<TelebusConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new()
            .file(path)
            .with_env()
            .load()
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => load_config()?,
    };

    if config.bots.is_empty() {
        let mut bot = BotConfig::new(config.default_bot.clone(), "console");
        bot.username = Some("EchoBot".to_string());
        bot.commands = vec!["start".into(), "echo".into(), "ping".into(), "greet".into()];
        config.bots.push(bot);
    }

    Ok(config)
}

async fn read_updates(path: Option<&PathBuf>) -> Result<Vec<Update>> {
    let Some(path) = path else {
        return Ok(sample_updates()?);
    };
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("invalid updates in {}", path.display()))
}

fn sample_updates() -> serde_json::Result<Vec<Update>> {
    serde_json::from_value(json!([
        {
            "update_id": 1,
            "message": {
                "message_id": 1,
                "chat": { "id": 42, "type": "private" },
                "text": "/start",
                "entities": [{ "type": "bot_command", "offset": 0, "length": 6 }]
            }
        },
        {
            "update_id": 2,
            "message": {
                "message_id": 2,
                "chat": { "id": 42, "type": "private" },
                "text": "/say@EchoBot hello there",
                "entities": [{ "type": "bot_command", "offset": 0, "length": 12 }]
            }
        },
        {
            "update_id": 3,
            "message": {
                "message_id": 3,
                "chat": { "id": 42, "type": "private" },
                "text": "/greet alice then /ping",
                "entities": [
                    { "type": "bot_command", "offset": 0, "length": 6 },
                    { "type": "bot_command", "offset": 18, "length": 5 }
                ]
            }
        },
        {
            "update_id": 4,
            "message": {
                "message_id": 4,
                "chat": { "id": 42, "type": "private" },
                "text": "/unknown",
                "entities": [{ "type": "bot_command", "offset": 0, "length": 8 }]
            }
        }
    ]))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load(&cli)?;
    logging::init_from_config(&config.logging);

    let manager = BotManager::new(config, catalog(), |bot| Arc::new(ConsoleApi::new(bot)));
    let bot = match &cli.bot {
        Some(name) => manager.bot(name)?,
        None => manager.default_bot()?,
    };
    info!(
        bot = %bot.name(),
        commands = ?bot.command_bus().registry().names(),
        "Bot ready"
    );

    for update in read_updates(cli.updates.as_ref()).await? {
        match bot.handle_update(&update).await {
            Ok(report) => info!(
                update_id = update.update_id,
                invoked = ?report.invoked,
                failed = ?report.failed,
                unresolved = ?report.unresolved,
                "Dispatched"
            ),
            Err(e) => warn!(update_id = update.update_id, error = %e, "Dispatch failed"),
        }
    }

    if cli.sync {
        bot.sync_commands().await?;
    }

    Ok(())
}
