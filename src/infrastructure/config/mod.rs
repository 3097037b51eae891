//! Configuration management

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::domain::entities::{DrinkRecord, Price};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub server: ServerConfig,
    pub line: LineConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub callback_path: String,
}

/// Messaging platform credentials. Usually supplied through the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LineConfig {
    pub channel_secret: Option<String>,
    pub channel_token: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CatalogConfig {
    pub bootstrap_path: PathBuf,
    pub columns: ColumnMapping,
    pub default_sweetness: String,
    pub default_ice: String,
    pub recent_limit: usize,
    pub seed: SeedConfig,
}

/// Zero-based CSV column positions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ColumnMapping {
    pub vendor: Option<usize>,
    pub name: usize,
    pub price: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SeedConfig {
    pub name: String,
    pub sweetness: String,
    pub ice: String,
    pub price: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "drink-bot".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            callback_path: "/callback".to_string(),
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_token: None,
            api_base: "https://api.line.me".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bootstrap_path: PathBuf::from("code/drink.csv"),
            columns: ColumnMapping::default(),
            default_sweetness: "light sugar".to_string(),
            default_ice: "light ice".to_string(),
            recent_limit: 10,
            seed: SeedConfig::default(),
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            vendor: Some(0),
            name: 1,
            price: 2,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            name: "Water".to_string(),
            sweetness: "no sugar".to_string(),
            ice: "no ice".to_string(),
            price: 0,
        }
    }
}

impl ColumnMapping {
    /// Minimum number of fields a row needs
    pub fn width(&self) -> usize {
        [Some(self.name), Some(self.price), self.vendor]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl SeedConfig {
    pub fn record(&self) -> DrinkRecord {
        DrinkRecord::new(&self.name, &self.sweetness, &self.ice, Price::new(self.price))
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load `path` if it exists, otherwise defaults, then apply the environment
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        let config = config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.server.callback_path;
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "server.callback-path must start with '/': {:?}",
                path
            )));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override settings from variables looked up through `var`
    pub fn apply_vars<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = var("LINE_CHANNEL_SECRET") {
            self.line.channel_secret = Some(secret);
        }
        if let Some(token) = var("LINE_CHANNEL_TOKEN") {
            self.line.channel_token = Some(token);
        }
        if let Some(port) = var("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT={}", port)))?;
        }
        if let Some(path) = var("DRINK_CSV") {
            self.catalog.bootstrap_path = PathBuf::from(path);
        }
        Ok(self)
    }

    /// Channel secret and access token, both required to serve the webhook
    pub fn credentials(&self) -> Result<(String, String), ConfigError> {
        let secret = self.line.channel_secret.clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingField("LINE_CHANNEL_SECRET".to_string()))?;
        let token = self.line.channel_token.clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingField("LINE_CHANNEL_TOKEN".to_string()))?;
        Ok((secret, token))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("server.host={}", self.server.host)))
    }
}
