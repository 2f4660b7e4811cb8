//! Calendar views over the whole team.
//!
//! A [`TeamView`] is computed from one [`ScheduleSnapshot`]: the flattened
//! occurrences, the conflict set and the period columns always describe the
//! same revision of the collection.

use chrono::{Datelike, Days, NaiveDate, TimeDelta, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::schedule_store::ScheduleSnapshot;
use crate::algorithms::{detect_conflicts, group_occurrences, period_columns};
use crate::models::{flatten, ClassOccurrence, ConflictSlotKey, OccurrenceGroup};

/// Calendar granularity used when paging through the team calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Week,
    Day,
}

/// A shared class session plus the attendees that are double-booked in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCard {
    #[serde(flatten)]
    pub group: OccurrenceGroup,
    pub conflicted_students: Vec<String>,
}

impl GroupCard {
    pub fn has_conflict(&self) -> bool {
        !self.conflicted_students.is_empty()
    }
}

/// All sessions of one period on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCell {
    pub period: String,
    pub groups: Vec<GroupCard>,
}

/// One day of the week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub cells: Vec<PeriodCell>,
}

/// Derived, read-only view of the team calendar.
#[derive(Debug, Clone)]
pub struct TeamView {
    revision: u64,
    occurrences: Vec<ClassOccurrence>,
    conflicts: BTreeSet<ConflictSlotKey>,
    periods: Vec<String>,
}

impl TeamView {
    pub fn from_snapshot(snapshot: &ScheduleSnapshot) -> Self {
        let occurrences = flatten(snapshot.schedules());
        let conflicts = detect_conflicts(&occurrences);
        let periods = period_columns(&occurrences);
        debug!(
            "Computed team view at revision {}: {} occurrence(s), {} conflicting slot(s)",
            snapshot.revision(),
            occurrences.len(),
            conflicts.len()
        );

        Self {
            revision: snapshot.revision(),
            occurrences,
            conflicts,
            periods,
        }
    }

    /// Revision of the snapshot this view was computed from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn occurrences(&self) -> &[ClassOccurrence] {
        &self.occurrences
    }

    pub fn conflicts(&self) -> &BTreeSet<ConflictSlotKey> {
        &self.conflicts
    }

    /// Period columns, computed from all occurrences regardless of filters.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn is_student_in_conflict(&self, student_name: &str, date: NaiveDate, period: &str) -> bool {
        self.conflicts
            .contains(&ConflictSlotKey::new(student_name, date, period))
    }

    /// Sessions of `date`, one cell per period column.
    pub fn day_grid(&self, date: NaiveDate, query: &str) -> Vec<PeriodCell> {
        let on_date: Vec<&ClassOccurrence> = filter_occurrences(&self.occurrences, query)
            .into_iter()
            .filter(|o| o.date == date)
            .collect();

        self.periods
            .iter()
            .map(|period| {
                let cell = on_date.iter().copied().filter(|o| &o.period == period);
                let groups = group_occurrences(cell)
                    .into_iter()
                    .map(|group| self.card(group, date, period))
                    .collect();
                PeriodCell {
                    period: period.clone(),
                    groups,
                }
            })
            .collect()
    }

    /// Day grids for the Monday-first week containing `anchor`.
    pub fn week_grid(&self, anchor: NaiveDate, query: &str) -> Vec<DayColumn> {
        week_of(anchor)
            .into_iter()
            .map(|date| DayColumn {
                date,
                day_of_week: weekday_label(date).to_string(),
                cells: self.day_grid(date, query),
            })
            .collect()
    }

    fn card(&self, group: OccurrenceGroup, date: NaiveDate, period: &str) -> GroupCard {
        let conflicted_students = group
            .students
            .iter()
            .filter(|s| self.is_student_in_conflict(s, date, period))
            .cloned()
            .collect();
        GroupCard {
            group,
            conflicted_students,
        }
    }
}

/// Keep occurrences whose course, teacher, location or student contains
/// `query`, ignoring case. A blank query keeps everything.
pub fn filter_occurrences<'a>(occurrences: &'a [ClassOccurrence], query: &str) -> Vec<&'a ClassOccurrence> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return occurrences.iter().collect();
    }

    let matches = |field: &str| field.to_lowercase().contains(&needle);
    occurrences
        .iter()
        .filter(|o| {
            matches(&o.course_name)
                || matches(&o.teacher)
                || o.location.as_deref().is_some_and(|l| matches(l))
                || matches(&o.student_name)
        })
        .collect()
}

/// Days of the Monday-first week containing `date`.
///
/// Shorter than seven days only at the edges of the representable calendar.
pub fn week_of(date: NaiveDate) -> Vec<NaiveDate> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let Some(monday) = date.checked_sub_days(Days::new(offset)) else {
        return vec![date];
    };
    (0..7)
        .filter_map(|i| monday.checked_add_days(Days::new(i)))
        .collect()
}

/// Single-character Chinese weekday name, as used in schedule documents.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Sun => "日",
        Weekday::Mon => "一",
        Weekday::Tue => "二",
        Weekday::Wed => "三",
        Weekday::Thu => "四",
        Weekday::Fri => "五",
        Weekday::Sat => "六",
    }
}

/// Move `anchor` by `amount` weeks or days. `None` on calendar overflow.
pub fn navigate(anchor: NaiveDate, mode: ViewMode, amount: i64) -> Option<NaiveDate> {
    let days = match mode {
        ViewMode::Week => amount.checked_mul(7)?,
        ViewMode::Day => amount,
    };
    anchor.checked_add_signed(TimeDelta::try_days(days)?)
}
