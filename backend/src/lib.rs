//! # Team Schedule Backend
//!
//! Shared class calendar for a team of university students.
//!
//! Each student uploads a structured class schedule for one academic year.
//! This crate admits those documents, keeps one schedule per student, and
//! derives a team calendar from them: who is in which class on which date,
//! which students share a session, and which students are booked into two
//! classes at once. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Ingestion**: Parse and validate uploaded schedule documents, with
//!   authorization and replace-on-reupload semantics
//! - **Date Resolution**: Turn partial `"MM-DD"` dates into calendar dates
//!   using the academic year
//! - **Conflict Detection**: Within one upload and across the whole team
//! - **Grouping**: Merge students attending the same session
//! - **Persistence**: Pluggable key-value backends (in-memory, JSON files)
//! - **HTTP API**: RESTful endpoints for the calendar frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Schedule documents, users, dates and derived occurrences
//! - [`algorithms`]: Conflict detection and occurrence grouping
//! - [`db`]: Key-value persistence layer and store configuration
//! - [`services`]: Schedule store and team calendar views
//! - [`api`]: Public types and user-facing action results
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use team_schedule::db::LocalStore;
//! use team_schedule::models::CurrentUser;
//! use team_schedule::services::{ScheduleStore, TeamView};
//!
//! let mut store = ScheduleStore::open(Box::new(LocalStore::new())).unwrap();
//! let doc = r#"{
//!     "student_name": "张三",
//!     "academic_year": "2024-2025",
//!     "schedule": [{"week_number": 1, "dates": "09-02 - 09-08", "days": [
//!         {"date": "09-02", "day_of_week": "一", "classes": [
//!             {"period": "第一大节", "course_name": "高等数学", "type": "理论", "teacher": "李老师"}
//!         ]}
//!     ]}]
//! }"#;
//!
//! let user = CurrentUser::user("alice");
//! store.add(doc, "", Some(&user), |_| false).unwrap();
//!
//! let view = TeamView::from_snapshot(&store.snapshot());
//! assert_eq!(view.occurrences().len(), 1);
//! assert!(view.conflicts().is_empty());
//! ```

// StoreError carries an ErrorContext for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ScheduleError, ScheduleResult};
