//! Store configuration file support.
//!
//! This module provides utilities for reading store configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::StoreError;
use super::factory::StoreType;

/// Store configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store: StoreSettings,
    #[serde(default)]
    pub file: FileSettings,
}

/// Store type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(rename = "type")]
    pub store_type: String,
}

/// File store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("data")
}

impl StoreConfig {
    /// Configuration for the in-memory store.
    pub fn local() -> Self {
        Self {
            store: StoreSettings {
                store_type: "local".to_string(),
            },
            file: FileSettings::default(),
        }
    }

    /// Configuration for a file store rooted at `directory`.
    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreSettings {
                store_type: "file".to_string(),
            },
            file: FileSettings {
                directory: directory.into(),
            },
        }
    }

    /// Load store configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(StoreConfig)` if successful
    /// * `Err(StoreError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            StoreError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse store configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, StoreError> {
        toml::from_str(content)
            .map_err(|e| StoreError::configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Load store configuration from the default location.
    ///
    /// Searches for `schedule.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when none of them exists. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn from_default_location() -> Result<Option<Self>, StoreError> {
        let search_paths = [
            PathBuf::from("schedule.toml"),
            PathBuf::from("backend/schedule.toml"),
            PathBuf::from("../schedule.toml"),
        ];
        Self::from_first_existing(&search_paths)
    }

    /// Load the first of `paths` that exists.
    pub fn from_first_existing(paths: &[PathBuf]) -> Result<Option<Self>, StoreError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path).map(Some),
            None => Ok(None),
        }
    }

    /// Get the store type from configuration.
    pub fn store_type(&self) -> Result<StoreType, String> {
        StoreType::from_str(&self.store.store_type)
    }
}
