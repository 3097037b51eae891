//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Reply delivery failed: {0}")]
    UpstreamSend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Catalog operation errors.
///
/// The `Display` text of each variant is the reply the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Format error")]
    Format,

    #[error("Item already in list")]
    DuplicateItem,

    #[error("Not found")]
    NotFound,

    /// Delete aimed at the seed record; users see the same reply as a miss
    #[error("Not found")]
    PermanentItem,

    #[error("No drinks available yet")]
    EmptyCatalog,
}

/// CSV bootstrap errors
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
