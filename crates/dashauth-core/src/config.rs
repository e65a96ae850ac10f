//! Application configuration management.
//!
//! This module handles loading the client configuration: the API
//! base URL, where the dashboard token is stored, and the request timeout.
//!
//! Configuration is stored at `~/.config/dashauth/config.json`. A few
//! `DASHAUTH_*` environment variables override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "dashauth";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Storage key for the dashboard token
pub const DEFAULT_STORAGE_KEY: &str = "dashboard_token";

/// Backend API prefix when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const ENV_API_BASE: &str = "DASHAUTH_API_BASE";
const ENV_STORAGE: &str = "DASHAUTH_STORAGE";
const ENV_STORAGE_KEY: &str = "DASHAUTH_STORAGE_KEY";

/// Where the dashboard token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// OS keychain
    Keyring,
    /// JSON file in the cache directory
    #[default]
    File,
    /// Current process only
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(StorageBackend::Keyring),
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub storage: StorageBackend,
    pub storage_key: String,
    /// Directory for file storage; defaults to the platform cache directory
    pub storage_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage: StorageBackend::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Config with process-local token storage, for tests and headless use
    pub fn in_memory(api_base: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(api_base) = lookup(ENV_API_BASE) {
            self.api_base = api_base;
        }
        if let Some(storage) = lookup(ENV_STORAGE) {
            self.storage = storage
                .parse::<StorageBackend>()
                .with_context(|| format!("Invalid {}", ENV_STORAGE))?;
        }
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Open the configured token storage backend
    pub fn build_storage(&self) -> Result<Box<dyn TokenStorage>> {
        let storage: Box<dyn TokenStorage> = match self.storage {
            StorageBackend::Keyring => Box::new(KeyringStorage::new(self.storage_key.clone())),
            StorageBackend::File => {
                Box::new(FileStorage::new(self.storage_dir()?, &self.storage_key))
            }
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}
