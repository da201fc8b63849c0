//! # Telebus Core
//!
//! The value objects and contracts shared by every telebus crate.
//!
//! This crate deliberately knows nothing about commands. It provides:
//!
//! - **Update model**: serde mirrors of the Telegram `Update` JSON shape
//!   ([`Update`], [`Message`], [`MessageEntity`], [`Chat`], [`User`])
//! - **Text spans**: UTF-16 aware slicing helpers, because Telegram measures
//!   entity offsets in UTF-16 code units ([`text`])
//! - **API contract**: the [`BotApi`] trait, an opaque handle handed to command
//!   handlers so they can talk back to Telegram
//!
//! ```text
//! ┌──────────────┐  Update   ┌──────────────┐  &dyn BotApi  ┌───────────┐
//! │  transport   │──────────▶│  CommandBus  │──────────────▶│  Command  │
//! │ (external)   │           │ (framework)  │               │  handler  │
//! └──────────────┘           └──────────────┘               └───────────┘
//! ```

pub mod api;
pub mod error;
pub mod text;
pub mod types;

pub use api::{BotApi, BotCommand, BoxedApi, ChatAction};
pub use error::{ApiError, ApiResult};
pub use text::{utf16_len, utf16_slice, utf16_to_byte_index};
pub use types::{Chat, Message, MessageEntity, Update, UpdateKind, User};

/// Prelude for common imports.
pub mod prelude {
    pub use super::api::{BotApi, BotCommand, BoxedApi, ChatAction};
    pub use super::error::{ApiError, ApiResult};
    pub use super::types::{Chat, Message, MessageEntity, Update, UpdateKind, User};
}
