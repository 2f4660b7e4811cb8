//! HTTP server module for the team schedule backend.
//!
//! This module provides an axum-based HTTP server that exposes the schedule
//! store and the team calendar as a REST API. It reuses the service layer
//! and public types from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing, acting user from headers              │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - ScheduleStore behind a RwLock                          │
//! │  - TeamView computed per request from one snapshot        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Persistence Layer (db/)                                  │
//! │  - LocalStore / FileStore                                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
