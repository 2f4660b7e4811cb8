//! Store factory for dependency injection.
//!
//! This module provides utilities for creating and configuring store instances
//! based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use super::error::{StoreError, StoreResult};
use super::store::KeyValueStore;
use super::store_config::StoreConfig;
use super::stores::{FileStore, LocalStore};

/// Store type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// JSON files on disk
    File,
    /// In-memory local store
    Local,
}

impl FromStr for StoreType {
    type Err = String;

    /// Parse store type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("file", "fs", "local", "memory")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "fs" => Ok(Self::File),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

impl StoreType {
    /// Get store type from environment variables.
    ///
    /// Reads `STORE_TYPE`. Defaults to File if `STORE_DIR` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("STORE_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("STORE_DIR").is_ok() {
            Self::File
        } else {
            Self::Local
        }
    }
}

/// Factory for creating store instances.
///
/// # Example
/// ```
/// use team_schedule::db::{KeyValueStore, StoreConfig, StoreFactory};
///
/// let store = StoreFactory::from_config(&StoreConfig::local()).unwrap();
/// assert!(store.health_check().unwrap());
/// ```
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store instance based on type.
    ///
    /// # Arguments
    /// * `store_type` - Type of store to create
    /// * `directory` - Directory for file stores (required for File)
    pub fn create(
        store_type: StoreType,
        directory: Option<&Path>,
    ) -> StoreResult<Box<dyn KeyValueStore>> {
        match store_type {
            StoreType::File => {
                let directory = directory.ok_or_else(|| {
                    StoreError::configuration("File store requires a directory")
                })?;
                Ok(Box::new(FileStore::new(directory)?))
            }
            StoreType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local store.
    pub fn create_local() -> Box<dyn KeyValueStore> {
        Box::new(LocalStore::new())
    }

    /// Create store from environment configuration.
    ///
    /// Uses `STORE_TYPE` and `STORE_DIR` (default `data`).
    pub fn from_env() -> StoreResult<Box<dyn KeyValueStore>> {
        let directory = std::env::var("STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        Self::create(StoreType::from_env(), Some(directory.as_path()))
    }

    /// Create store from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(config_path: P) -> StoreResult<Box<dyn KeyValueStore>> {
        let config = StoreConfig::from_file(config_path)?;
        Self::from_config(&config)
    }

    /// Create store from the default configuration file location, or from
    /// the environment when no configuration file exists.
    pub fn from_default_config() -> StoreResult<Box<dyn KeyValueStore>> {
        Self::from_config_or_env(StoreConfig::from_default_location()?)
    }

    /// Create store from `config` if one was found, else from the environment.
    pub fn from_config_or_env(config: Option<StoreConfig>) -> StoreResult<Box<dyn KeyValueStore>> {
        match config {
            Some(config) => Self::from_config(&config),
            None => {
                info!("No schedule.toml found, using environment configuration");
                Self::from_env()
            }
        }
    }

    /// Create store from a StoreConfig instance.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Box<dyn KeyValueStore>> {
        let store_type = config.store_type().map_err(|e| {
            StoreError::configuration(format!("Invalid store type: {}", e))
        })?;
        Self::create(store_type, Some(config.file.directory.as_path()))
    }
}
