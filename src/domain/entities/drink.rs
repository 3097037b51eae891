use std::fmt;
use std::str::FromStr;

use crate::application::errors::CatalogError;

/// Price in whole yuan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

impl Price {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn yuan(&self) -> u32 {
        self.0
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Price)
            .map_err(|_| CatalogError::Format)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.yuan())
    }
}

/// A single drink in the catalog. `name` is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkRecord {
    pub id: Option<u64>,
    pub vendor: Option<String>,
    pub name: String,
    pub sweetness: String,
    pub ice: String,
    pub price: Price,
}

impl DrinkRecord {
    pub fn new(
        name: impl Into<String>,
        sweetness: impl Into<String>,
        ice: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: None,
            vendor: None,
            name: name.into(),
            sweetness: sweetness.into(),
            ice: ice.into(),
            price,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        let vendor = vendor.into();
        self.vendor = if vendor.is_empty() { None } else { Some(vendor) };
        self
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Reply line: vendor (if any), name, sweetness, ice, then price.
    pub fn line(&self) -> String {
        match &self.vendor {
            Some(vendor) => format!(
                "{} {} {} {}, price: {} yuan",
                vendor, self.name, self.sweetness, self.ice, self.price
            ),
            None => format!(
                "{} {} {}, price: {} yuan",
                self.name, self.sweetness, self.ice, self.price
            ),
        }
    }
}

impl fmt::Display for DrinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line())
    }
}
