//! Persistence of the schedule collection.
//!
//! This module provides a small key-value abstraction so the storage backend
//! can be swapped without touching the schedule logic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP API, tests)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services::ScheduleStore)                │
//! │  - Authorization, validation, replace semantics         │
//! │  - One full write per completed mutation                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  KeyValueStore trait (store.rs)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │ LocalStore      FileStore    │
//!     │ (in-memory)     (JSON files) │
//!     └──────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `store`: Trait definition for load/save of whole JSON values
//! - `stores::local`: In-memory implementation for unit testing and local development
//! - `stores::file`: One JSON file per key
//! - `factory`: Factory for creating store instances
//! - `store_config`: TOML configuration

pub mod error;
pub mod factory;
pub mod store;
pub mod store_config;
pub mod stores;

pub use error::{ErrorContext, StoreError, StoreResult};
pub use factory::{StoreFactory, StoreType};
pub use store::KeyValueStore;
pub use store_config::StoreConfig;
pub use stores::{FileStore, LocalStore};
