//! Message parser - Turns raw message text into catalog commands

use crate::application::errors::CatalogError;
use crate::domain::entities::{CatalogCommand, Content, DrinkRecord, Price};

/// Parses incoming text into a `CatalogCommand`.
///
/// Dispatch looks only at the first character of the trimmed text. Anything
/// that does not start with `1`-`4` falls through to a recommendation.
#[derive(Debug, Clone, Default)]
pub struct MessageParser;

impl MessageParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse message content. `None` for content the bot does not answer.
    pub fn parse_content(&self, content: &Content) -> Option<Result<CatalogCommand, CatalogError>> {
        match content {
            Content::Text(text) => Some(self.parse(text)),
            Content::Sticker { .. } => Some(Ok(CatalogCommand::Recommend)),
            Content::Unsupported(_) => None,
        }
    }

    /// Parse a text message
    pub fn parse(&self, text: &str) -> Result<CatalogCommand, CatalogError> {
        let text = text.trim();
        let parts: Vec<&str> = text.split_whitespace().collect();

        match text.chars().next() {
            Some('1') => {
                let [_, name, sweetness, ice, price] = parts[..] else {
                    return Err(CatalogError::Format);
                };
                let price: Price = price.parse()?;
                Ok(CatalogCommand::Add(DrinkRecord::new(name, sweetness, ice, price)))
            }
            Some('2') => {
                let [_, name] = parts[..] else {
                    return Err(CatalogError::Format);
                };
                Ok(CatalogCommand::Delete { name: name.to_string() })
            }
            Some('3') => {
                let [_, name] = parts[..] else {
                    return Err(CatalogError::Format);
                };
                Ok(CatalogCommand::Search { name: name.to_string() })
            }
            Some('4') => Ok(CatalogCommand::ListRecent),
            _ => Ok(CatalogCommand::Recommend),
        }
    }
}
