//! Resolution of partial ("MM-DD") schedule dates into calendar dates.
//!
//! Schedule documents only carry month and day. The calendar year comes from
//! the leading year of the academic year label ("2024-2025" -> 2024) and is
//! applied to every date of the schedule. Months of the spring term are not
//! rolled over into the following year, so "01-15" in "2024-2025" resolves to
//! 2024-01-15.
//!
//! Out-of-range parts roll over the way calendar arithmetic does: "02-30"
//! in 2024 is 2024-03-01, "13-01" is January of the next year and a zero
//! month or day steps back into the previous one.

use chrono::{Days, Months, NaiveDate};

/// Extract the base calendar year from an academic year label.
///
/// The year is the run of leading ASCII digits in the segment before the
/// first `-`. Leading whitespace is ignored and trailing text after the digits
/// (e.g. "2024学年") is dropped.
pub fn base_year(academic_year: &str) -> Option<i32> {
    let head = academic_year.split('-').next()?.trim_start();
    let end = head
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(head.len());
    if end == 0 {
        return None;
    }
    head[..end].parse().ok()
}

/// Parse a partial `"MM-DD"` date into `(month, day)`.
///
/// Only the first two `-` separated segments are read.
pub fn parse_month_day(month_day: &str) -> Option<(u32, u32)> {
    let mut parts = month_day.split('-');
    let month = parts.next()?.trim().parse().ok()?;
    let day = parts.next()?.trim().parse().ok()?;
    Some((month, day))
}

/// Resolve a partial date against an academic year label.
///
/// Returns `None` when the academic year has no leading year, when the
/// partial date is not two integers, or when rolling over leaves chrono's
/// supported range.
pub fn resolve_date(academic_year: &str, month_day: &str) -> Option<NaiveDate> {
    DateResolver::for_academic_year(academic_year)?.resolve(month_day)
}

/// Resolver bound to the base year of one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    year: i32,
}

impl DateResolver {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Build a resolver from an academic year label, if it carries a year.
    pub fn for_academic_year(academic_year: &str) -> Option<Self> {
        base_year(academic_year).map(Self::new)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn resolve(&self, month_day: &str) -> Option<NaiveDate> {
        let (month, day) = parse_month_day(month_day)?;
        let new_year = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let first_of_month = match month {
            0 => new_year.checked_sub_months(Months::new(1))?,
            m => new_year.checked_add_months(Months::new(m - 1))?,
        };
        match day {
            0 => first_of_month.checked_sub_days(Days::new(1)),
            d => first_of_month.checked_add_days(Days::new(u64::from(d) - 1)),
        }
    }
}
