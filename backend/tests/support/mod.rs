//! Shared helpers for integration tests: scoped environment changes and
//! schedule document fixtures.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::{json, Value};
use team_schedule::db::LocalStore;
use team_schedule::services::ScheduleStore;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Two-week schedule of 张三 for 2024-2025 without internal conflicts.
pub const SAMPLE_SCHEDULE: &str = include_str!("../data/sample_schedule.json");

/// A class entry of a schedule document.
pub fn class(period: &str, course: &str, teacher: &str, location: Option<&str>) -> Value {
    json!({
        "period": period,
        "course_name": course,
        "type": "理论",
        "teacher": teacher,
        "location": location,
    })
}

/// A day entry of a schedule document.
pub fn day(date: &str, day_of_week: &str, classes: Vec<Value>) -> Value {
    json!({
        "date": date,
        "day_of_week": day_of_week,
        "classes": classes,
    })
}

/// A schedule document with all `days` in a single week.
pub fn document(student_name: &str, academic_year: &str, days: Vec<Value>) -> String {
    json!({
        "student_name": student_name,
        "academic_year": academic_year,
        "schedule": [{
            "week_number": 1,
            "dates": "",
            "days": days,
        }],
    })
    .to_string()
}

/// An empty store backed by an in-memory store; the backend handle shares
/// state with the store.
pub fn open_local_store() -> (ScheduleStore, LocalStore) {
    let backend = LocalStore::new();
    let store = ScheduleStore::open(Box::new(backend.clone())).unwrap();
    (store, backend)
}
