//! In-memory local store implementation.
//!
//! Values live in a `HashMap` for the lifetime of the process. Suitable for
//! unit tests and local development.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::error::{ErrorContext, StoreError, StoreResult};
use crate::db::store::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same underlying data, so a test can keep a handle to a
/// store after handing a clone to a [`ScheduleStore`](crate::services::ScheduleStore).
///
/// # Example
/// ```
/// use team_schedule::db::{KeyValueStore, LocalStore};
///
/// let store = LocalStore::new();
/// store.save("k", &serde_json::json!([1, 2])).unwrap();
/// assert_eq!(store.load("k").unwrap(), Some(serde_json::json!([1, 2])));
/// ```
#[derive(Clone)]
pub struct LocalStore {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    values: HashMap<String, serde_json::Value>,
    writes: usize,
    is_healthy: bool,
}

impl LocalStore {
    /// Create a new empty local store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                values: HashMap::new(),
                writes: 0,
                is_healthy: true,
            })),
        }
    }

    /// Create a store pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: serde_json::Value) -> Self {
        let store = Self::new();
        store.data.write().values.insert(key.into(), value);
        store
    }

    /// Set the health status for testing write failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.data.read().writes
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data from the store.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.values.clear();
        data.writes = 0;
    }

    fn check_health(&self, operation: &str, key: &str) -> StoreResult<()> {
        if !self.data.read().is_healthy {
            return Err(StoreError::Unavailable {
                message: "Local store is not healthy".to_string(),
                context: ErrorContext::new(operation).with_key(key).retryable(),
            });
        }
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn load(&self, key: &str) -> StoreResult<Option<serde_json::Value>> {
        self.check_health("load", key)?;
        Ok(self.data.read().values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> StoreResult<()> {
        self.check_health("save", key)?;
        let mut data = self.data.write();
        data.values.insert(key.to_string(), value.clone());
        data.writes += 1;
        Ok(())
    }

    fn health_check(&self) -> StoreResult<bool> {
        Ok(self.data.read().is_healthy)
    }
}
