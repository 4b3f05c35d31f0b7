//! Configuration loading and management
//!
//! Handles parsing of the optional `groceries.toml` file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_DB_FILE;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "groceries.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the list
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Author configuration
    #[serde(default)]
    pub author: AuthorConfig,

    /// Search behaviour
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            author: AuthorConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

/// Default `created_by` for new items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Match item text with exact case instead of SQLite's ASCII case folding
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, or return defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Database path, with an explicit override taking precedence
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        match cli_override {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => self.database.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("database cannot be empty".to_string()));
        }
        if let Some(author) = self.author.default.as_deref() {
            if author.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "author.default cannot be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}
