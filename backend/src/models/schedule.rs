// ============================================================================
// Schedule Documents
// ============================================================================
//
// Types for per-student class schedules as uploaded by users, plus parsing of
// the raw JSON document. Field names follow the uploaded documents
// (snake_case, weeks under "schedule", provenance under "uploadedBy").

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One class booked in a named period of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(default, alias = "courseName", deserialize_with = "null_as_default")]
    pub course_name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub class_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teacher: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// A day of a schedule week. `date` is a partial `"MM-DD"` date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, alias = "dayOfWeek", deserialize_with = "null_as_default")]
    pub day_of_week: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classes: Vec<ClassInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    #[serde(default, alias = "weekNumber", deserialize_with = "null_as_default")]
    pub week_number: i64,
    /// Human readable range label, e.g. `"09-02 - 09-08"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<Day>,
}

/// An admitted schedule: one per student name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, alias = "studentName", deserialize_with = "null_as_default")]
    pub student_name: String,
    #[serde(default, alias = "academicYear", deserialize_with = "null_as_default")]
    pub academic_year: String,
    #[serde(
        rename = "schedule",
        default,
        deserialize_with = "null_as_default"
    )]
    pub weeks: Vec<Week>,
    /// Username of the user who uploaded this schedule.
    #[serde(rename = "uploadedBy", default, deserialize_with = "null_as_default")]
    pub uploaded_by: String,
}

impl Schedule {
    /// Build an admitted schedule from a parsed document.
    pub fn from_document(
        document: ScheduleDocument,
        student_name: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            academic_year: document.academic_year,
            weeks: document.weeks,
            uploaded_by: uploaded_by.into(),
        }
    }

    /// Total number of classes listed in the schedule.
    pub fn class_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| &w.days)
            .map(|d| d.classes.len())
            .sum()
    }
}

/// Raw upload document, before a student name has been settled.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default, alias = "studentName", deserialize_with = "null_as_default")]
    pub student_name: String,
    #[serde(default, alias = "academicYear", deserialize_with = "null_as_default")]
    pub academic_year: String,
    #[serde(rename = "schedule", alias = "weeks")]
    pub weeks: Vec<Week>,
}

/// Schedule as exported for sharing, without the `uploadedBy` provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedSchedule {
    pub student_name: String,
    pub academic_year: String,
    pub schedule: Vec<Week>,
}

impl From<&Schedule> for ExportedSchedule {
    fn from(schedule: &Schedule) -> Self {
        Self {
            student_name: schedule.student_name.clone(),
            academic_year: schedule.academic_year.clone(),
            schedule: schedule.weeks.clone(),
        }
    }
}

/// Wire names accepted for each document field, canonical name first.
const DOCUMENT_KEYS: [(&str, &str); 3] = [
    ("student_name", "studentName"),
    ("academic_year", "academicYear"),
    ("schedule", "weeks"),
];

/// Check the document shape and settle on one key per field.
///
/// The canonical key wins when both spellings are present; the other one is
/// dropped so serde never sees the field twice.
fn normalize_input_document(value: &mut serde_json::Value) -> ScheduleResult<()> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| ScheduleError::MalformedInput("document must be a JSON object".into()))?;

    for (canonical, alias) in DOCUMENT_KEYS {
        if let Some(aliased) = obj.remove(alias) {
            if !obj.contains_key(canonical) {
                obj.insert(canonical.to_string(), aliased);
            }
        }
    }

    match obj.get("schedule") {
        Some(serde_json::Value::Array(_)) => Ok(()),
        _ => Err(ScheduleError::MalformedInput(
            "missing or invalid \"schedule\" array".into(),
        )),
    }
}

/// Parse an uploaded schedule document.
///
/// The weeks array is mandatory. Unknown fields are ignored; nested values of
/// the wrong shape are reported with their JSON path.
pub fn parse_schedule_document(json: &str) -> ScheduleResult<ScheduleDocument> {
    let mut value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ScheduleError::MalformedInput(format!("invalid JSON: {}", e)))?;
    normalize_input_document(&mut value)?;

    serde_path_to_error::deserialize(value)
        .map_err(|e| ScheduleError::MalformedInput(e.to_string()))
}
