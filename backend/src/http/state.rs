//! Application state for the HTTP server.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::services::ScheduleStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Schedule store; mutations take the write lock for their whole duration
    pub store: Arc<RwLock<ScheduleStore>>,
}

impl AppState {
    /// Create a new application state around the given store.
    pub fn new(store: ScheduleStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}
