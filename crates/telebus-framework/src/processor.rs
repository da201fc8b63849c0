use std::collections::HashMap;

use telebus_core::{MessageEntity, Update};

use crate::error::ParseError;
use crate::parser::CommandParser;

/// Finds commands in an update without running anything.
///
/// Uses the same entity filtering and name parsing as
/// [`CommandBus::handler`](crate::CommandBus::handler), leaving the dispatch
/// decision to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandsProcessor;

impl CommandsProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Maps each parsed command name to its entity.
    ///
    /// When a name appears more than once the later entity wins. Use
    /// [`entries`](Self::entries) to see every occurrence.
    pub fn handle(&self, update: &Update) -> Result<HashMap<String, MessageEntity>, ParseError> {
        Ok(self.entries(update)?.into_iter().collect())
    }

    /// Returns every `(name, entity)` pair in message order.
    pub fn entries(&self, update: &Update) -> Result<Vec<(String, MessageEntity)>, ParseError> {
        let Some(message) = update.message() else {
            return Ok(Vec::new());
        };

        message
            .bot_commands()
            .map(|entity| {
                let name = CommandParser::parse(message.text(), entity.offset, entity.length)?;
                Ok((name, entity.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use telebus_core::Message;

    use super::*;

    fn update(text: &str, entities: Vec<MessageEntity>) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                text: Some(text.into()),
                entities,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_handle_maps_names_to_entities() {
        let mention = MessageEntity {
            kind: "mention".into(),
            offset: 7,
            length: 4,
            ..Default::default()
        };
        let upd = update(
            "/start @bob /help@MyBot",
            vec![
                MessageEntity::bot_command(0, 6),
                mention,
                MessageEntity::bot_command(12, 11),
            ],
        );

        let found = CommandsProcessor::new().handle(&upd).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found["start"].offset, 0);
        assert_eq!(found["help"].offset, 12);
    }

    #[test]
    fn test_later_entity_wins() {
        let upd = update(
            "/demo a /demo b",
            vec![
                MessageEntity::bot_command(0, 5),
                MessageEntity::bot_command(8, 5),
            ],
        );
        let processor = CommandsProcessor::new();

        assert_eq!(processor.handle(&upd).unwrap()["demo"].offset, 8);

        let entries = processor.entries(&upd).unwrap();
        let offsets: Vec<usize> = entries.iter().map(|(_, e)| e.offset).collect();
        assert_eq!(offsets, [0, 8]);
    }

    #[test]
    fn test_no_message() {
        let found = CommandsProcessor::new().handle(&Update::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_empty_text_is_error() {
        let upd = update("", vec![MessageEntity::bot_command(0, 1)]);
        assert_eq!(
            CommandsProcessor::new().handle(&upd),
            Err(ParseError::EmptyMessage)
        );
    }
}
