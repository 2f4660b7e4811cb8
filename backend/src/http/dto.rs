//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Calendar payloads are re-exported from the api module since they already
//! derive Serialize/Deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::api::{ActionResult, Conflict, DayColumn, ExportedSchedule, PeriodCell};
use crate::models::ConflictSlotKey;

/// Request body for uploading a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScheduleRequest {
    /// Schedule document, either as a JSON object or as the raw JSON text
    pub document: serde_json::Value,
    /// Overrides the student name inside the document when non-blank
    #[serde(default)]
    pub student_name: String,
    /// Admit the schedule even if it conflicts with itself
    #[serde(default)]
    pub confirm_conflicts: bool,
}

impl AddScheduleRequest {
    /// The document as JSON text.
    pub fn document_text(&self) -> String {
        match &self.document {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Response for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScheduleResponse {
    #[serde(flatten)]
    pub result: ActionResult,
    /// Whether an earlier schedule of the same student was replaced
    pub replaced: bool,
    /// Self-conflicts admitted because the upload confirmed them
    pub acknowledged_conflicts: Vec<Conflict>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub store: String,
    /// Number of admitted schedules
    pub schedules: usize,
}

/// Team member entry in list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberDto {
    pub name: String,
    pub uploaded_by: String,
    /// Whether the requesting user may remove this schedule
    pub can_remove: bool,
}

/// Team list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamListResponse {
    pub members: Vec<TeamMemberDto>,
    /// Total count
    pub total: usize,
    pub revision: u64,
}

/// One double-booked slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictEntry {
    /// Slot key, `student-YYYY-MM-DD-period`
    pub key: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub period: String,
}

impl From<ConflictSlotKey> for ConflictEntry {
    fn from(slot: ConflictSlotKey) -> Self {
        Self {
            key: slot.to_string(),
            student_name: slot.student_name,
            date: slot.date,
            period: slot.period,
        }
    }
}

/// Team-wide conflict response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictsResponse {
    pub conflicts: Vec<ConflictEntry>,
    pub revision: u64,
}

/// Query parameters for calendar endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarQuery {
    /// Anchor date (optional, default: today)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Case-insensitive filter on course, teacher, location or student
    #[serde(default)]
    pub q: Option<String>,
}

/// Week calendar response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekResponse {
    pub revision: u64,
    pub periods: Vec<String>,
    pub days: Vec<DayColumn>,
    /// Anchor of the previous week
    pub previous: Option<NaiveDate>,
    /// Anchor of the next week
    pub next: Option<NaiveDate>,
}

/// Day calendar response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResponse {
    pub revision: u64,
    pub date: NaiveDate,
    pub day_of_week: String,
    pub cells: Vec<PeriodCell>,
    pub previous: Option<NaiveDate>,
    pub next: Option<NaiveDate>,
}
