use crate::application::errors::CatalogError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{CatalogCommand, Content};
use crate::domain::traits::Store;

/// Default number of drinks listed by the `4` command
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Command interpreter: parses text, runs it against the store and
/// always produces a reply string.
pub struct CommandService<S: Store> {
    store: S,
    parser: MessageParser,
    recent_limit: usize,
}

impl<S: Store> CommandService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            parser: MessageParser::new(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reply for message content, `None` if the content is not handled.
    /// Catalog errors are rendered as the reply text.
    pub async fn handle(&self, content: &Content) -> Option<String> {
        let result = match self.parser.parse_content(content)? {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };
        Some(result.unwrap_or_else(|e| e.to_string()))
    }

    pub async fn execute(&self, command: CatalogCommand) -> Result<String, CatalogError> {
        if command.is_mutation() {
            tracing::info!("Catalog command: {}", command.name());
        } else {
            tracing::debug!("Catalog command: {}", command.name());
        }

        match command {
            CatalogCommand::Add(record) => {
                self.store.insert(record).await?;
                Ok("Added successfully".to_string())
            }
            CatalogCommand::Delete { name } => {
                self.store.remove_by_name(&name).await?;
                Ok("Deleted successfully".to_string())
            }
            CatalogCommand::Search { name } => {
                let record = self.store.find_by_name(&name).await?;
                Ok(record.line())
            }
            CatalogCommand::ListRecent => {
                let lines: Vec<String> = self.store
                    .latest(self.recent_limit)
                    .await
                    .iter()
                    .map(|d| d.line())
                    .collect();
                Ok(lines.join("\n"))
            }
            CatalogCommand::Recommend => {
                let record = self.store.random_pick().await?;
                Ok(format!("Recommended drink: {}", record.line()))
            }
        }
    }
}
