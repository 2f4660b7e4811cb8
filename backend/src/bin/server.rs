//! Team Schedule HTTP Server Binary
//!
//! This is the main entry point for the team schedule REST API server.
//! It opens the schedule store, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the store configured in schedule.toml, or an in-memory store
//! cargo run --bin team-schedule-server
//!
//! # Keep schedules in JSON files under ./data
//! STORE_TYPE=file STORE_DIR=./data cargo run --bin team-schedule-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `STORE_TYPE`: `file` or `local` (used when no schedule.toml is found)
//! - `STORE_DIR`: Directory of the file store (default: data)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use team_schedule::db::StoreFactory;
use team_schedule::http::{create_router, AppState};
use team_schedule::services::ScheduleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting team schedule HTTP server");

    // A schedule.toml that exists but does not parse stops startup.
    let backend = StoreFactory::from_default_config()?;
    let store = ScheduleStore::open(backend)?;
    info!("Schedule store opened with {} schedule(s)", store.len());

    // Create application state
    let state = AppState::new(store);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
