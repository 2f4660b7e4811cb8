//! Key-value store implementations.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON files on disk, one per key
pub mod file;
pub mod local;

pub use file::FileStore;
pub use local::LocalStore;
