use async_trait::async_trait;
use crate::application::errors::CatalogError;
use crate::domain::entities::DrinkRecord;

/// Store trait - abstraction for the drink catalog.
///
/// Results are returned by value so no lock outlives a call.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(&self, record: DrinkRecord) -> Result<DrinkRecord, CatalogError>;
    /// Append bootstrap records without the uniqueness check
    async fn extend(&self, records: Vec<DrinkRecord>) -> usize;
    async fn remove_by_name(&self, name: &str) -> Result<DrinkRecord, CatalogError>;
    async fn find_by_name(&self, name: &str) -> Result<DrinkRecord, CatalogError>;
    async fn latest(&self, n: usize) -> Vec<DrinkRecord>;
    async fn random_pick(&self) -> Result<DrinkRecord, CatalogError>;
    /// Total records, seed included
    async fn len(&self) -> usize;
}
