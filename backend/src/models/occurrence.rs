//! Derived per-class records and the flattening of schedules into them.
//!
//! Nothing here is persisted: occurrences, slot keys and groups are recomputed
//! from the admitted schedules every time they are needed.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::DateResolver;
use super::schedule::Schedule;

/// One concrete class booking of a student on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOccurrence {
    pub student_name: String,
    pub date: NaiveDate,
    pub day_of_week: String,
    pub period: String,
    pub course_name: String,
    #[serde(rename = "type")]
    pub class_type: String,
    pub teacher: String,
    pub location: Option<String>,
}

impl ClassOccurrence {
    pub fn slot_key(&self) -> ConflictSlotKey {
        ConflictSlotKey::new(&self.student_name, self.date, &self.period)
    }
}

/// A bookable slot: one student, one date, one period.
///
/// Displays as `student-YYYY-MM-DD-period`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConflictSlotKey {
    pub student_name: String,
    pub date: NaiveDate,
    pub period: String,
}

impl ConflictSlotKey {
    pub fn new(student_name: impl Into<String>, date: NaiveDate, period: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            date,
            period: period.into(),
        }
    }
}

impl fmt::Display for ConflictSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.student_name,
            self.date.format("%Y-%m-%d"),
            self.period
        )
    }
}

/// One class session within a `(date, period)` cell and everyone attending it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceGroup {
    pub course_name: String,
    pub teacher: String,
    pub location: Option<String>,
    /// Attending students in first-seen order, without duplicates.
    pub students: Vec<String>,
}

/// Expand schedules into class occurrences.
///
/// Output follows input nesting order (schedule, week, day, class); it is not
/// sorted by date. Schedules without an academic year, days without a date and
/// days whose date does not resolve are skipped. Out-of-range dates such as
/// "02-30" roll over into the next month.
pub fn flatten(schedules: &[Schedule]) -> Vec<ClassOccurrence> {
    let mut occurrences = Vec::new();

    for schedule in schedules {
        if schedule.academic_year.is_empty() || schedule.weeks.is_empty() {
            continue;
        }
        let Some(resolver) = DateResolver::for_academic_year(&schedule.academic_year) else {
            debug!(
                "Skipping schedule of '{}': academic year '{}' has no leading year",
                schedule.student_name, schedule.academic_year
            );
            continue;
        };

        for day in schedule.weeks.iter().flat_map(|w| &w.days) {
            if day.date.is_empty() {
                continue;
            }
            let Some(date) = resolver.resolve(&day.date) else {
                debug!(
                    "Skipping {} classes of '{}' on unresolvable date '{}'",
                    day.classes.len(),
                    schedule.student_name,
                    day.date
                );
                continue;
            };

            occurrences.extend(day.classes.iter().map(|class| ClassOccurrence {
                student_name: schedule.student_name.clone(),
                date,
                day_of_week: day.day_of_week.clone(),
                period: class.period.clone(),
                course_name: class.course_name.clone(),
                class_type: class.class_type.clone(),
                teacher: class.teacher.clone(),
                location: class.location.clone(),
            }));
        }
    }

    occurrences
}
