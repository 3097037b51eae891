use super::DrinkRecord;

/// A parsed catalog command.
///
/// `Recommend` is the default arm: any input that is not one of the
/// numbered commands asks for a random drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// `1 <name> <sweetness> <ice> <price>`
    Add(DrinkRecord),
    /// `2 <name>`
    Delete { name: String },
    /// `3 <name>`
    Search { name: String },
    /// `4`
    ListRecent,
    Recommend,
}

impl CatalogCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogCommand::Add(_) => "add",
            CatalogCommand::Delete { .. } => "delete",
            CatalogCommand::Search { .. } => "search",
            CatalogCommand::ListRecent => "list",
            CatalogCommand::Recommend => "recommend",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, CatalogCommand::Add(_) | CatalogCommand::Delete { .. })
    }
}
