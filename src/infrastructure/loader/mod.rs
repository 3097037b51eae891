//! CSV bootstrap loader

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::application::errors::LoaderError;
use crate::domain::entities::{DrinkRecord, Price};
use crate::domain::traits::Store;
use crate::infrastructure::config::{CatalogConfig, ColumnMapping};

/// Reads the drink menu file once at startup.
///
/// Columns are positional; sweetness and ice are not in the file and get
/// fixed default labels.
pub struct CsvLoader {
    path: PathBuf,
    columns: ColumnMapping,
    default_sweetness: String,
    default_ice: String,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        Self {
            path: path.into(),
            columns,
            default_sweetness: "light sugar".to_string(),
            default_ice: "light ice".to_string(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.bootstrap_path, config.columns.clone())
            .with_defaults(&config.default_sweetness, &config.default_ice)
    }

    pub fn with_defaults(mut self, sweetness: impl Into<String>, ice: impl Into<String>) -> Self {
        self.default_sweetness = sweetness.into();
        self.default_ice = ice.into();
        self
    }

    /// Read every data row of the configured file
    pub fn read(&self) -> Result<Vec<DrinkRecord>, LoaderError> {
        let file = File::open(&self.path)?;
        self.read_from(file)
    }

    /// Read records from any CSV source. The first row is a header.
    ///
    /// A malformed file fails as a whole; rows that are too short or carry a
    /// non-numeric price are skipped.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<DrinkRecord>, LoaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // header is line 1
            if let Some(record) = self.row_to_record(&row, index + 2) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn row_to_record(&self, row: &StringRecord, line: usize) -> Option<DrinkRecord> {
        if row.len() < self.columns.width() {
            tracing::warn!(
                "Skipping line {} of {}: expected {} columns, found {}",
                line,
                self.path.display(),
                self.columns.width(),
                row.len()
            );
            return None;
        }

        let name = row.get(self.columns.name).unwrap_or("");
        if name.is_empty() {
            tracing::warn!("Skipping line {} of {}: empty item name", line, self.path.display());
            return None;
        }

        let raw_price = row.get(self.columns.price).unwrap_or("");
        let price: Price = match raw_price.parse() {
            Ok(price) => price,
            Err(_) => {
                tracing::warn!(
                    "Skipping line {} of {}: invalid price {:?}",
                    line,
                    self.path.display(),
                    raw_price
                );
                return None;
            }
        };

        let mut record = DrinkRecord::new(name, &self.default_sweetness, &self.default_ice, price);
        if let Some(vendor) = self.columns.vendor.and_then(|i| row.get(i)) {
            record = record.with_vendor(vendor);
        }
        Some(record)
    }

    /// Load the file into the store. Failures are logged and leave the store
    /// untouched; returns the number of records appended.
    pub async fn bootstrap<S: Store + ?Sized>(&self, store: &S) -> usize {
        match self.read() {
            Ok(records) => {
                let count = store.extend(records).await;
                tracing::info!("Loaded {} drinks from {}", count, self.path.display());
                count
            }
            Err(e) => {
                tracing::warn!("Bootstrap read failure for {}: {}", self.path.display(), e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;
    use std::io::Write;

    const MENU: &str = "store,item,price\nComebuy,Black Tea,30\nComebuy,Milk Tea,45\nKebuke,Oolong,35\n";

    fn loader() -> CsvLoader {
        CsvLoader::new("menu.csv", ColumnMapping::default())
    }

    fn seed_store() -> MemoryStore {
        MemoryStore::new(DrinkRecord::new("Water", "no sugar", "no ice", Price::new(0)))
    }

    #[test]
    fn test_read_three_columns() {
        let records = loader().read_from(MENU.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.vendor.as_deref(), Some("Comebuy"));
        assert_eq!(first.name, "Black Tea");
        assert_eq!(first.price, Price::new(30));
        assert_eq!(first.sweetness, "light sugar");
        assert_eq!(first.ice, "light ice");
    }

    #[test]
    fn test_read_two_columns() {
        let columns = ColumnMapping {
            vendor: None,
            name: 0,
            price: 1,
        };
        let loader = CsvLoader::new("menu.csv", columns).with_defaults("half sugar", "no ice");
        let records = loader.read_from("item,price\nGreen Tea, 25 \n".as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vendor, None);
        assert_eq!(records[0].name, "Green Tea");
        assert_eq!(records[0].price, Price::new(25));
        assert_eq!(records[0].sweetness, "half sugar");
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let data = "store,item,price\nA,Tea,abc\nB,Coffee\nC,,20\nD,Latte,60\n";
        let records = loader().read_from(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Latte");
    }

    #[test]
    fn test_header_only() {
        let records = loader().read_from("store,item,price\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MENU.as_bytes()).unwrap();

        let store = seed_store();
        let loaded = CsvLoader::new(file.path(), ColumnMapping::default())
            .bootstrap(&store)
            .await;
        assert_eq!(loaded, 3);
        assert_eq!(store.len().await, 4);
        assert_eq!(store.latest(1).await[0].name, "Oolong");
    }

    #[tokio::test]
    async fn test_bootstrap_missing_file_keeps_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = seed_store();
        let loaded = CsvLoader::new(dir.path().join("missing.csv"), ColumnMapping::default())
            .bootstrap(&store)
            .await;
        assert_eq!(loaded, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_invalid_utf8_appends_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"store,item,price\nA,Tea,30\nB,\xff\xfe,40\n").unwrap();

        let store = seed_store();
        let loaded = CsvLoader::new(file.path(), ColumnMapping::default())
            .bootstrap(&store)
            .await;
        assert_eq!(loaded, 0);
        assert_eq!(store.len().await, 1);
    }
}
