//! In-memory catalog storage

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::CatalogError;
use crate::domain::entities::{Catalog, DrinkRecord};
use crate::domain::traits::Store;

/// Process-lifetime catalog shared between request handlers.
///
/// Every mutation (duplicate check included) runs under a single write
/// guard; readers clone their results out under a read guard.
#[derive(Clone)]
pub struct MemoryStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl MemoryStore {
    pub fn new(seed: DrinkRecord) -> Self {
        Self::from_catalog(Catalog::new(seed))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, record: DrinkRecord) -> Result<DrinkRecord, CatalogError> {
        let mut catalog = self.catalog.write().await;
        catalog.insert(record).cloned()
    }

    async fn extend(&self, records: Vec<DrinkRecord>) -> usize {
        let mut catalog = self.catalog.write().await;
        let count = records.len();
        for record in records {
            catalog.append(record);
        }
        count
    }

    async fn remove_by_name(&self, name: &str) -> Result<DrinkRecord, CatalogError> {
        let mut catalog = self.catalog.write().await;
        catalog.remove_by_name(name)
    }

    async fn find_by_name(&self, name: &str) -> Result<DrinkRecord, CatalogError> {
        let catalog = self.catalog.read().await;
        catalog.find_by_name(name).cloned()
    }

    async fn latest(&self, n: usize) -> Vec<DrinkRecord> {
        let catalog = self.catalog.read().await;
        catalog.latest(n).into_iter().cloned().collect()
    }

    async fn random_pick(&self) -> Result<DrinkRecord, CatalogError> {
        let catalog = self.catalog.read().await;
        catalog.random_pick(&mut rand::thread_rng()).cloned()
    }

    async fn len(&self) -> usize {
        self.catalog.read().await.len()
    }
}
