use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::models::{ClassOccurrence, ConflictSlotKey, DateResolver, Schedule};

/// Two classes of one schedule claiming the same date and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Partial date as written in the document (`"MM-DD"`).
    pub date: String,
    pub period: String,
    /// Course that first occupied the slot.
    pub course_a: String,
    /// Course that later claimed the same slot.
    pub course_b: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: \"{}\" conflicts with \"{}\"",
            self.date, self.period, self.course_a, self.course_b
        )
    }
}

/// Find classes within a single schedule that share a date and period.
///
/// Every class after the first one in a slot is reported against the first
/// occupant, so a three-way clash yields two conflicts. Returns nothing when
/// the academic year carries no year: without real dates nothing can be
/// checked. Days whose date does not resolve are skipped; out-of-range dates
/// roll over and are checked on the date they land on.
pub fn find_self_conflicts(schedule: &Schedule) -> Vec<Conflict> {
    let Some(resolver) = DateResolver::for_academic_year(&schedule.academic_year) else {
        debug!(
            "Cannot validate schedule of '{}' without a year in '{}'",
            schedule.student_name, schedule.academic_year
        );
        return Vec::new();
    };

    let mut occupied: HashMap<(NaiveDate, &str), &str> = HashMap::new();
    let mut conflicts = Vec::new();

    for day in schedule.weeks.iter().flat_map(|w| &w.days) {
        if day.date.is_empty() {
            continue;
        }
        let Some(date) = resolver.resolve(&day.date) else {
            continue;
        };

        for class in &day.classes {
            match occupied.entry((date, class.period.as_str())) {
                Entry::Occupied(first) => conflicts.push(Conflict {
                    date: day.date.clone(),
                    period: class.period.clone(),
                    course_a: first.get().to_string(),
                    course_b: class.course_name.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(class.course_name.as_str());
                }
            }
        }
    }

    conflicts
}

/// Find every slot booked more than once across a set of occurrences.
///
/// Slots are scoped per student: two different students in the same period
/// are not a conflict. Student names are compared literally. The result does
/// not depend on the order of the input.
pub fn detect_conflicts<'a, I>(occurrences: I) -> BTreeSet<ConflictSlotKey>
where
    I: IntoIterator<Item = &'a ClassOccurrence>,
{
    let mut counts: HashMap<(&str, NaiveDate, &str), usize> = HashMap::new();
    for occurrence in occurrences {
        *counts
            .entry((
                occurrence.student_name.as_str(),
                occurrence.date,
                occurrence.period.as_str(),
            ))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((student, date, period), _)| ConflictSlotKey::new(student, date, period))
        .collect()
}
