use std::collections::{BTreeSet, HashMap};

use crate::models::{ClassOccurrence, OccurrenceGroup};

/// Period labels with a known order; other labels sort after these.
pub const CANONICAL_PERIODS: [&str; 5] = ["第一大节", "第二大节", "第三大节", "第四大节", "第五大节"];

fn canonical_rank(period: &str) -> Option<usize> {
    CANONICAL_PERIODS.iter().position(|p| *p == period)
}

/// Merge the occurrences of one `(date, period)` cell into shared sessions.
///
/// Occurrences with identical course, teacher and location form one group.
/// Groups keep first-seen order and so do the students inside each group.
pub fn group_occurrences<'a, I>(cell: I) -> Vec<OccurrenceGroup>
where
    I: IntoIterator<Item = &'a ClassOccurrence>,
{
    let mut groups: Vec<OccurrenceGroup> = Vec::new();
    let mut index: HashMap<(&'a str, &'a str, Option<&'a str>), usize> = HashMap::new();

    for occurrence in cell {
        let key = (
            occurrence.course_name.as_str(),
            occurrence.teacher.as_str(),
            occurrence.location.as_deref(),
        );
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(OccurrenceGroup {
                course_name: occurrence.course_name.clone(),
                teacher: occurrence.teacher.clone(),
                location: occurrence.location.clone(),
                students: Vec::new(),
            });
            groups.len() - 1
        });

        let students = &mut groups[slot].students;
        if !students.contains(&occurrence.student_name) {
            students.push(occurrence.student_name.clone());
        }
    }

    groups
}

/// Order period labels for display.
///
/// Canonical labels come first in canonical order; any other label follows in
/// lexicographic order. Duplicates collapse to one entry.
pub fn order_periods<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = labels
        .into_iter()
        .map(|label| label.as_ref().to_string())
        .collect();

    let mut ordered: Vec<String> = unique.into_iter().collect();
    // Stable sort keeps the lexicographic order among non-canonical labels.
    ordered.sort_by_key(|p| canonical_rank(p).map_or((1, 0), |rank| (0, rank)));
    ordered
}

/// Period columns for a set of occurrences.
///
/// Falls back to the canonical periods when there is nothing to show.
pub fn period_columns(occurrences: &[ClassOccurrence]) -> Vec<String> {
    if occurrences.is_empty() {
        return CANONICAL_PERIODS.iter().map(|p| p.to_string()).collect();
    }
    order_periods(occurrences.iter().map(|o| o.period.as_str()))
}
