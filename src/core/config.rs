use crate::core::currency::{self, Currency};
use crate::core::error::ViewError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FileSourceConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HttpSourceConfig {
    pub url: String,
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,
}

fn default_revalidate_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SourceConfig {
    File(FileSourceConfig),
    Http(HttpSourceConfig),
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "currency::default_currencies")]
    pub currencies: Vec<Currency>,
    pub source: Option<SourceConfig>,
    pub limit: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            currencies: currency::default_currencies(),
            source: None,
            limit: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "coinview", "coinview")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Looks up `code` among the configured currencies.
    pub fn resolve_currency(&self, code: &str) -> Result<Currency, ViewError> {
        currency::resolve(&self.currencies, code).cloned()
    }
}
