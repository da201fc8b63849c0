//! Telegram update value objects.
//!
//! Only the fields the command layer and its reply helpers read are modelled.
//! Everything else in the Telegram payload is ignored on deserialization.
//!
//! # Hierarchy
//!
//! ```text
//! Update { update_id }
//! ├── message / edited_message / channel_post / edited_channel_post
//! │   └── Message { message_id, date, chat, from, text, entities }
//! │       └── MessageEntity { type, offset, length, ... }
//! ```

use serde::{Deserialize, Serialize};

/// Entity type tag for bot commands (`/start`, `/help@MyBot`).
pub const BOT_COMMAND: &str = "bot_command";

/// An incoming update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// The update's unique identifier.
    pub update_id: i64,

    /// New incoming message of any kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// New version of a message that was edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,

    /// New incoming channel post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<Message>,

    /// New version of a channel post that was edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_channel_post: Option<Message>,
}

/// Which payload an [`Update`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    /// A payload this crate does not model (callback queries, polls, ...).
    Unknown,
}

impl UpdateKind {
    /// Returns the Telegram field name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::EditedMessage => "edited_message",
            Self::ChannelPost => "channel_post",
            Self::EditedChannelPost => "edited_channel_post",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Update {
    /// Detects which payload this update carries.
    pub fn kind(&self) -> UpdateKind {
        if self.message.is_some() {
            UpdateKind::Message
        } else if self.edited_message.is_some() {
            UpdateKind::EditedMessage
        } else if self.channel_post.is_some() {
            UpdateKind::ChannelPost
        } else if self.edited_channel_post.is_some() {
            UpdateKind::EditedChannelPost
        } else {
            UpdateKind::Unknown
        }
    }

    /// Returns the `message` field.
    ///
    /// Command dispatch reads this field only; edited messages and channel
    /// posts never trigger commands.
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Returns whichever message-like payload is present.
    pub fn recent_message(&self) -> Option<&Message> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
    }

    /// Returns the chat the update belongs to, if any.
    pub fn chat(&self) -> Option<&Chat> {
        self.recent_message().map(|m| &m.chat)
    }
}

/// A Telegram message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier inside its chat.
    pub message_id: i64,

    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,

    /// The conversation the message belongs to.
    pub chat: Chat,

    /// Sender, empty for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,

    /// Text of a text message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Caption of a media message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Special entities in `text`, ordered by offset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<MessageEntity>,

    /// Special entities in `caption`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption_entities: Vec<MessageEntity>,
}

impl Message {
    /// Returns the message text, or `""` for non-text messages.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Iterates the `bot_command` entities of `text` in message order.
    pub fn bot_commands(&self) -> impl Iterator<Item = &MessageEntity> {
        self.entities.iter().filter(|e| e.is_bot_command())
    }
}

/// A span of message text tagged with a semantic type.
///
/// `offset` and `length` are measured in UTF-16 code units; use
/// [`utf16_slice`](crate::text::utf16_slice) to read the covered text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    /// Entity type (`bot_command`, `mention`, `url`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Offset in UTF-16 code units to the start of the entity.
    pub offset: usize,

    /// Length of the entity in UTF-16 code units.
    pub length: usize,

    /// For `text_link` only, the URL opened on tap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// For `text_mention` only, the mentioned user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// For `pre` only, the programming language of the entity text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// For `custom_emoji` only, the identifier of the sticker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_emoji_id: Option<String>,
}

impl MessageEntity {
    /// Creates a `bot_command` entity.
    pub fn bot_command(offset: usize, length: usize) -> Self {
        Self {
            kind: BOT_COMMAND.to_string(),
            offset,
            length,
            ..Default::default()
        }
    }

    /// Returns `true` if this entity is a bot command.
    pub fn is_bot_command(&self) -> bool {
        self.kind == BOT_COMMAND
    }
}

/// A chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: i64,

    /// `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Title for groups, supergroups and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Username for private chats, supergroups and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATE_JSON: &str = r#"{
        "update_id": 10000,
        "message": {
            "message_id": 1365,
            "date": 1441645532,
            "chat": { "id": 1111111, "type": "private", "username": "Test" },
            "from": { "id": 1111111, "is_bot": false, "first_name": "Test", "last_name": "Lastname" },
            "text": "/start hello @someone",
            "entities": [
                { "type": "bot_command", "offset": 0, "length": 6 },
                { "type": "mention", "offset": 13, "length": 8 }
            ],
            "reply_markup": { "inline_keyboard": [] }
        }
    }"#;

    #[test]
    fn test_deserialize_update() {
        let update: Update = serde_json::from_str(UPDATE_JSON).unwrap();
        assert_eq!(update.update_id, 10000);
        assert_eq!(update.kind(), UpdateKind::Message);

        let message = update.message().unwrap();
        assert_eq!(message.chat.id, 1111111);
        assert_eq!(message.chat.kind, "private");
        assert_eq!(message.text(), "/start hello @someone");
        assert_eq!(message.entities.len(), 2);
        assert_eq!(message.from.as_ref().unwrap().first_name, "Test");
    }

    #[test]
    fn test_bot_commands_filters_other_entities() {
        let update: Update = serde_json::from_str(UPDATE_JSON).unwrap();
        let commands: Vec<_> = update.message().unwrap().bot_commands().collect();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].offset, 0);
        assert_eq!(commands[0].length, 6);
    }

    #[test]
    fn test_edited_message_is_not_dispatchable() {
        let update = Update {
            update_id: 1,
            edited_message: Some(Message {
                message_id: 7,
                chat: Chat {
                    id: 42,
                    ..Default::default()
                },
                text: Some("/start".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(update.kind(), UpdateKind::EditedMessage);
        assert!(update.message().is_none());
        assert_eq!(update.chat().map(|c| c.id), Some(42));
    }

    #[test]
    fn test_entity_serializes_type_field() {
        let value = serde_json::to_value(MessageEntity::bot_command(0, 5)).unwrap();
        assert_eq!(value["type"], "bot_command");
        assert!(value.get("url").is_none());
    }
}
