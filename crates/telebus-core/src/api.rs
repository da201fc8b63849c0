//! The Bot API contract handed to command handlers.
//!
//! The command layer never performs I/O itself. Handlers receive a
//! `&dyn BotApi` and use it to reply. Concrete implementations (an HTTP
//! client, a test recorder, a console printer) only have to provide
//! [`call_api`](BotApi::call_api); the typed helpers are built on top of it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiResult;
use crate::types::Message;

/// A command entry as published through `setMyCommands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCommand {
    /// Command name without the leading slash.
    pub command: String,
    /// Short description shown in the Telegram client.
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

/// Chat actions accepted by `sendChatAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
}

impl ChatAction {
    /// Returns the wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordVoice => "record_voice",
            Self::UploadVoice => "upload_voice",
            Self::UploadDocument => "upload_document",
            Self::ChooseSticker => "choose_sticker",
            Self::FindLocation => "find_location",
        }
    }
}

/// The execution context passed opaquely into command handlers.
///
/// # API Design
///
/// - `call_api`: raw method call, returns the `result` field of a successful
///   response
/// - `send_message`, `send_chat_action`, `set_my_commands`: typed helpers
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct ConsoleApi;
///
/// #[async_trait]
/// impl BotApi for ConsoleApi {
///     async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
///         println!("{method}: {params}");
///         Ok(Value::Bool(true))
///     }
/// }
/// ```
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Returns the bot's username (without `@`), when known.
    fn username(&self) -> Option<&str> {
        None
    }

    /// Calls a Bot API method with JSON parameters.
    ///
    /// # Arguments
    ///
    /// * `method` - The method name (e.g. `"sendMessage"`)
    /// * `params` - A JSON object with the method parameters
    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value>;

    /// Sends a text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> ApiResult<Message> {
        let result = self
            .call_api("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Broadcasts a chat action such as "typing...".
    async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> ApiResult<bool> {
        let result = self
            .call_api(
                "sendChatAction",
                json!({ "chat_id": chat_id, "action": action.as_str() }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Replaces the list of commands shown in the Telegram client.
    async fn set_my_commands(&self, commands: &[BotCommand]) -> ApiResult<bool> {
        let result = self
            .call_api("setMyCommands", json!({ "commands": commands }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// A shared Bot API handle.
pub type BoxedApi = Arc<dyn BotApi>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl BotApi for RecordingApi {
        async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), params.clone()));
            match method {
                "sendMessage" => Ok(json!({
                    "message_id": 1,
                    "date": 0,
                    "chat": { "id": params["chat_id"], "type": "private" },
                    "text": params["text"],
                })),
                "sendChatAction" | "setMyCommands" => Ok(Value::Bool(true)),
                _ => Err(ApiError::NotConnected),
            }
        }
    }

    #[tokio::test]
    async fn test_send_message_builds_params() {
        let api = RecordingApi::default();
        let message = api.send_message(42, "hello").await.unwrap();

        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text(), "hello");

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0].0, "sendMessage");
        assert_eq!(calls[0].1, json!({ "chat_id": 42, "text": "hello" }));
    }

    #[tokio::test]
    async fn test_chat_action_wire_name() {
        let api = RecordingApi::default();
        assert!(api.send_chat_action(1, ChatAction::UploadPhoto).await.unwrap());

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0].1["action"], "upload_photo");
    }

    #[tokio::test]
    async fn test_set_my_commands_payload() {
        let api = RecordingApi::default();
        let commands = vec![BotCommand::new("start", "Start the bot")];
        assert!(api.set_my_commands(&commands).await.unwrap());

        let calls = api.calls.lock().unwrap();
        assert_eq!(
            calls[0].1,
            json!({ "commands": [{ "command": "start", "description": "Start the bot" }] })
        );
    }

    #[tokio::test]
    async fn test_unknown_method_error() {
        let api = RecordingApi::default();
        let err = api.call_api("getMe", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::NotConnected));
    }
}
