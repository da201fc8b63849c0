//! Command name extraction.
//!
//! Telegram marks every `/command` token with a `bot_command` entity. The
//! parser reads the text covered by such an entity and turns it into the bare
//! name used for registry lookups:
//!
//! ```text
//! "/start"              -> "start"
//! "/demo@testing_Bot"   -> "demo"
//! ```

use telebus_core::text::utf16_slice;

use crate::error::ParseError;

/// Extracts bare command names from message text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser;

impl CommandParser {
    /// Parses the command covered by a `bot_command` entity.
    ///
    /// `offset` and `length` are UTF-16 code units, exactly as Telegram
    /// reports them. The leading `/` is skipped. A `@BotName` suffix is
    /// dropped when the name contains `@` and ends in `bot` or `Bot`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::EmptyMessage`] when `text` is blank
    /// - [`ParseError::EntityOutOfBounds`] when the span does not fit `text`
    pub fn parse(text: &str, offset: usize, length: usize) -> Result<String, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyMessage);
        }

        let out_of_bounds = || ParseError::EntityOutOfBounds { offset, length };
        let name = if length <= 1 {
            // The slash alone; still validate that the entity sits on the text.
            utf16_slice(text, offset, length).ok_or_else(out_of_bounds)?;
            ""
        } else {
            utf16_slice(text, offset + 1, length - 1).ok_or_else(out_of_bounds)?
        };

        if (name.ends_with("bot") || name.ends_with("Bot"))
            && let Some((command, _)) = name.split_once('@')
        {
            return Ok(command.to_string());
        }

        Ok(name.to_string())
    }
}
