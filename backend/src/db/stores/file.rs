//! File-backed store: one pretty-printed `<key>.json` file per key.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::error::{ErrorContext, StoreError, StoreResult};
use crate::db::store::KeyValueStore;

/// Key-value store persisting each key as a JSON file inside a directory.
///
/// Saves write a temporary file next to the target and rename it over the
/// old one, so readers never observe a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Open a store in `directory`, creating the directory if needed.
    pub fn new(directory: impl Into<PathBuf>) -> StoreResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| StoreError::Io {
            message: format!("Failed to create store directory: {}", e),
            context: ErrorContext::new("open").with_details(directory.display().to_string()),
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Configuration {
                message: "Store keys may only contain ASCII letters, digits, '_' and '-'"
                    .to_string(),
                context: ErrorContext::new("path_for").with_key(key),
            });
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| StoreError::from(e).with_operation("load").with_key(key))?;
        let value = serde_json::from_str(&content)
            .map_err(|e| StoreError::from(e).with_operation("load").with_key(key))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::from(e).with_operation("save").with_key(key))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| StoreError::from(e).with_operation("save").with_key(key))?;

        debug!("Saved '{}' to {}", key, path.display());
        Ok(())
    }

    fn health_check(&self) -> StoreResult<bool> {
        Ok(self.directory.is_dir())
    }
}
