//! Key-value store trait used to persist the schedule collection.

use super::error::StoreResult;

/// Synchronous key-value persistence of JSON values.
///
/// Every `save` replaces the whole value stored under the key. There are no
/// transactions and no partial updates.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a store can sit behind shared
/// server state.
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The stored JSON value
    /// * `Ok(None)` - Nothing has been stored under this key
    /// * `Err(StoreError)` - If the value could not be read or decoded
    fn load(&self, key: &str) -> StoreResult<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &serde_json::Value) -> StoreResult<()>;

    /// Check whether the store is accepting operations.
    fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
