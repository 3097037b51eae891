use rand::seq::SliceRandom;
use rand::Rng;

use super::DrinkRecord;
use crate::application::errors::CatalogError;

/// Ordered drink collection.
///
/// The seed record is always present. It can be looked up and blocks
/// duplicates, but it is never removed, listed as recent, or recommended.
#[derive(Debug, Clone)]
pub struct Catalog {
    seed: DrinkRecord,
    items: Vec<DrinkRecord>,
    next_id: u64,
}

impl Catalog {
    pub fn new(seed: DrinkRecord) -> Self {
        Self {
            seed: seed.with_id(0),
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Total records, seed included
    pub fn len(&self) -> usize {
        self.items.len() + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrinkRecord> {
        std::iter::once(&self.seed).chain(self.items.iter())
    }

    fn assign_id(&mut self, record: DrinkRecord) -> DrinkRecord {
        let id = self.next_id;
        self.next_id += 1;
        record.with_id(id)
    }

    /// Append a new record, rejecting an existing name (case-sensitive).
    pub fn insert(&mut self, record: DrinkRecord) -> Result<&DrinkRecord, CatalogError> {
        if self.iter().any(|d| d.name == record.name) {
            return Err(CatalogError::DuplicateItem);
        }
        let record = self.assign_id(record);
        self.items.push(record);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Append without the uniqueness check. Used for bootstrap data.
    pub fn append(&mut self, record: DrinkRecord) {
        let record = self.assign_id(record);
        self.items.push(record);
    }

    pub fn remove_by_name(&mut self, name: &str) -> Result<DrinkRecord, CatalogError> {
        match self.items.iter().position(|d| d.name == name) {
            Some(index) => Ok(self.items.remove(index)),
            None if self.seed.name == name => Err(CatalogError::PermanentItem),
            None => Err(CatalogError::NotFound),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Result<&DrinkRecord, CatalogError> {
        self.iter()
            .find(|d| d.name == name)
            .ok_or(CatalogError::NotFound)
    }

    /// Up to `n` most recently added records, newest first
    pub fn latest(&self, n: usize) -> Vec<&DrinkRecord> {
        self.items.iter().rev().take(n).collect()
    }

    pub fn random_pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&DrinkRecord, CatalogError> {
        self.items.choose(rng).ok_or(CatalogError::EmptyCatalog)
    }
}
