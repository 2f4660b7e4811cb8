//! Public API surface of the schedule engine.
//!
//! This file consolidates the types callers need to drive the store and read
//! the team calendar, plus the uniform [`ActionResult`] reported back to users
//! after an upload or removal. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::algorithms::Conflict;
pub use crate::models::{
    ClassInfo, ClassOccurrence, ConflictSlotKey, CurrentUser, Day, ExportedSchedule,
    OccurrenceGroup, Role, Schedule, ScheduleDocument, Week,
};
pub use crate::services::{
    AddedSchedule, DayColumn, GroupCard, PeriodCell, TeamMember, TeamView, ViewMode,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;

/// Outcome of a user action, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            student_name: Some(student_name.into()),
        }
    }

    /// Successful action that touched no schedule.
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            student_name: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            student_name: None,
        }
    }

    /// Describe the result of [`ScheduleStore::add`](crate::services::ScheduleStore::add).
    pub fn from_add(result: &ScheduleResult<AddedSchedule>) -> Self {
        match result {
            Ok(added) if added.replaced => ActionResult::ok(
                format!("Replaced the schedule of {}", added.student_name),
                &added.student_name,
            ),
            Ok(added) => ActionResult::ok(
                format!("Added the schedule of {}", added.student_name),
                &added.student_name,
            ),
            Err(e) => ActionResult::failed(e.to_string()),
        }
    }

    /// Describe the result of [`ScheduleStore::remove`](crate::services::ScheduleStore::remove).
    pub fn from_remove(student_name: &str, result: &ScheduleResult<bool>) -> Self {
        match result {
            Ok(true) => ActionResult::ok(format!("Removed the schedule of {}", student_name), student_name),
            Ok(false) => ActionResult::unchanged(format!("No schedule found for {}, nothing removed", student_name)),
            Err(e) => ActionResult::failed(e.to_string()),
        }
    }
}

/// File name for a team export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("team_schedule_{}.json", date.format("%Y-%m-%d"))
}
