//! The admitted schedule collection and its mutation API.
//!
//! [`ScheduleStore`] owns the collection. Every mutation goes through
//! [`ScheduleStore::add`] or [`ScheduleStore::remove`], completes with exactly
//! one write of the full collection, and either commits entirely or leaves the
//! collection untouched. Readers take a [`ScheduleSnapshot`] and derive
//! everything else from it.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::algorithms::{find_self_conflicts, Conflict};
use crate::db::{KeyValueStore, StoreError};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{parse_schedule_document, CurrentUser, ExportedSchedule, Schedule};

/// Storage key of the schedule collection.
pub const SCHEDULES_KEY: &str = "universitySchedules";

/// Immutable view of the collection at one revision.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    revision: u64,
    schedules: Arc<Vec<Schedule>>,
}

impl ScheduleSnapshot {
    pub fn new(revision: u64, schedules: Vec<Schedule>) -> Self {
        Self {
            revision,
            schedules: Arc::new(schedules),
        }
    }

    /// Incremented on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedSchedule {
    pub student_name: String,
    /// Whether an earlier schedule for the same student was replaced.
    pub replaced: bool,
    /// Self-conflicts the uploader chose to accept.
    pub acknowledged_conflicts: Vec<Conflict>,
}

/// A student in the team listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub uploaded_by: String,
}

impl TeamMember {
    /// Whether `actor` may remove this member's schedule.
    pub fn can_remove(&self, actor: Option<&CurrentUser>) -> bool {
        actor.is_some_and(|user| user.can_manage(&self.uploaded_by))
    }
}

/// Owner of the admitted schedules, one per student name.
pub struct ScheduleStore {
    backend: Box<dyn KeyValueStore>,
    schedules: Arc<Vec<Schedule>>,
    revision: u64,
}

impl ScheduleStore {
    /// Open the store, loading the persisted collection once.
    ///
    /// A stored value that is not a schedule collection is logged and
    /// ignored; the store then starts empty.
    pub fn open(backend: Box<dyn KeyValueStore>) -> ScheduleResult<Self> {
        let stored = match backend.load(SCHEDULES_KEY) {
            Ok(stored) => stored,
            Err(StoreError::Serialization { message, .. }) => {
                warn!("Ignoring unparsable stored schedules: {}", message);
                None
            }
            Err(e) => return Err(e.into()),
        };
        let schedules = match stored {
            Some(value) => match serde_json::from_value::<Vec<Schedule>>(value) {
                Ok(schedules) => schedules,
                Err(e) => {
                    warn!("Ignoring unreadable stored schedules: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        info!("Loaded {} schedule(s)", schedules.len());

        Ok(Self {
            backend,
            schedules: Arc::new(schedules),
            revision: 0,
        })
    }

    /// Admit an uploaded schedule document.
    ///
    /// The student name is the trimmed `student_name_override` when non-empty,
    /// otherwise the trimmed name inside the document. When the schedule
    /// conflicts with itself, `confirm` is asked whether to proceed; it is not
    /// called otherwise. An existing schedule for the same student is
    /// replaced, and the new one goes to the end of the collection.
    pub fn add<F>(
        &mut self,
        document: &str,
        student_name_override: &str,
        actor: Option<&CurrentUser>,
        confirm: F,
    ) -> ScheduleResult<AddedSchedule>
    where
        F: FnOnce(&[Conflict]) -> bool,
    {
        let user = actor.ok_or(ScheduleError::Unauthenticated)?;
        let document = parse_schedule_document(document)?;

        let student_name = match student_name_override.trim() {
            "" => document.student_name.trim().to_string(),
            name => name.to_string(),
        };
        if student_name.is_empty() {
            return Err(ScheduleError::MissingStudentName);
        }

        let schedule = Schedule::from_document(document, student_name.clone(), &user.username);

        let conflicts = find_self_conflicts(&schedule);
        if !conflicts.is_empty() {
            warn!(
                "Schedule of '{}' has {} conflict(s) within itself",
                student_name,
                conflicts.len()
            );
            if !confirm(&conflicts) {
                return Err(ScheduleError::UserCancelled { conflicts });
            }
        }

        let mut next: Vec<Schedule> = self
            .schedules
            .iter()
            .filter(|s| s.student_name != student_name)
            .cloned()
            .collect();
        let replaced = next.len() != self.schedules.len();
        next.push(schedule);
        self.commit(next)?;

        info!(
            "{} schedule of '{}' (uploaded by '{}')",
            if replaced { "Replaced" } else { "Added" },
            student_name,
            user.username
        );

        Ok(AddedSchedule {
            student_name,
            replaced,
            acknowledged_conflicts: conflicts,
        })
    }

    /// Remove the schedule of `student_name`.
    ///
    /// Only admins and the uploader may remove a schedule. Returns `Ok(false)`
    /// without writing anything when no such schedule exists.
    pub fn remove(&mut self, student_name: &str, actor: Option<&CurrentUser>) -> ScheduleResult<bool> {
        let user = actor.ok_or(ScheduleError::Unauthenticated)?;

        let Some(existing) = self.get(student_name) else {
            return Ok(false);
        };
        if !user.can_manage(&existing.uploaded_by) {
            return Err(ScheduleError::Denied {
                student_name: student_name.to_string(),
                username: user.username.clone(),
            });
        }

        let next: Vec<Schedule> = self
            .schedules
            .iter()
            .filter(|s| s.student_name != student_name)
            .cloned()
            .collect();
        self.commit(next)?;

        info!("Removed schedule of '{}' (by '{}')", student_name, user.username);
        Ok(true)
    }

    /// Persist `next` and make it the current collection.
    ///
    /// Nothing changes in memory when the write fails.
    fn commit(&mut self, next: Vec<Schedule>) -> Result<(), StoreError> {
        let value = serde_json::to_value(&next)
            .map_err(|e| StoreError::from(e).with_operation("save").with_key(SCHEDULES_KEY))?;
        self.backend.save(SCHEDULES_KEY, &value)?;

        self.schedules = Arc::new(next);
        self.revision += 1;
        Ok(())
    }

    /// All admitted schedules in insertion order.
    pub fn all(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn get(&self, student_name: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.student_name == student_name)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Immutable copy of the current collection.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            revision: self.revision,
            schedules: Arc::clone(&self.schedules),
        }
    }

    /// Students with a schedule, sorted by name.
    pub fn team_members(&self) -> Vec<TeamMember> {
        let mut members: Vec<TeamMember> = self
            .schedules
            .iter()
            .map(|s| TeamMember {
                name: s.student_name.clone(),
                uploaded_by: s.uploaded_by.clone(),
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// The collection without upload provenance.
    pub fn export(&self) -> Vec<ExportedSchedule> {
        self.schedules.iter().map(ExportedSchedule::from).collect()
    }

    /// The exported collection as pretty-printed JSON.
    pub fn export_json(&self) -> ScheduleResult<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| ScheduleError::Storage(StoreError::from(e).with_operation("export")))
    }

    pub fn health_check(&self) -> ScheduleResult<bool> {
        Ok(self.backend.health_check()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalStore;
    use serde_json::json;

    fn document(name: &str, classes: serde_json::Value) -> String {
        json!({
            "student_name": name,
            "academic_year": "2024-2025",
            "schedule": [{
                "week_number": 1,
                "dates": "09-02 - 09-08",
                "days": [{"date": "09-02", "day_of_week": "一", "classes": classes}]
            }]
        })
        .to_string()
    }

    fn math() -> serde_json::Value {
        json!([{"period": "第一大节", "course_name": "高等数学", "type": "理论", "teacher": "李老师", "location": "A101"}])
    }

    fn open_store() -> (ScheduleStore, LocalStore) {
        let backend = LocalStore::new();
        let store = ScheduleStore::open(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    fn never_called(_: &[Conflict]) -> bool {
        panic!("confirmation should not be requested")
    }

    #[test]
    fn test_add_stamps_uploader_and_persists() {
        let (mut store, backend) = open_store();
        let alice = CurrentUser::user("alice");

        let added = store
            .add(&document("张三", math()), "", Some(&alice), never_called)
            .unwrap();
        assert_eq!(added.student_name, "张三");
        assert!(!added.replaced);
        assert_eq!(store.all()[0].uploaded_by, "alice");
        assert_eq!(backend.write_count(), 1);

        let persisted = backend.load(SCHEDULES_KEY).unwrap().unwrap();
        assert_eq!(persisted[0]["uploadedBy"], "alice");
    }

    #[test]
    fn test_add_requires_user() {
        let (mut store, backend) = open_store();
        let result = store.add(&document("张三", math()), "", None, never_called);
        assert!(matches!(result, Err(ScheduleError::Unauthenticated)));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_override_name_is_trimmed_and_wins() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        store
            .add(&document("张三", math()), "  李四  ", Some(&alice), never_called)
            .unwrap();
        assert_eq!(store.all()[0].student_name, "李四");
    }

    #[test]
    fn test_missing_student_name() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        let result = store.add(&document("   ", math()), " ", Some(&alice), never_called);
        assert!(matches!(result, Err(ScheduleError::MissingStudentName)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_readd_replaces_and_moves_to_end() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        store.add(&document("甲", math()), "", Some(&alice), never_called).unwrap();
        store.add(&document("乙", math()), "", Some(&alice), never_called).unwrap();
        let added = store
            .add(&document("甲", json!([])), "", Some(&alice), never_called)
            .unwrap();

        assert!(added.replaced);
        let names: Vec<_> = store.all().iter().map(|s| s.student_name.as_str()).collect();
        assert_eq!(names, vec!["乙", "甲"]);
        assert_eq!(store.get("甲").unwrap().class_count(), 0);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_self_conflict_declined_leaves_store_unchanged() {
        let (mut store, backend) = open_store();
        let alice = CurrentUser::user("alice");
        let classes = json!([
            {"period": "第一大节", "course_name": "高等数学", "teacher": "李老师"},
            {"period": "第一大节", "course_name": "线性代数", "teacher": "王老师"}
        ]);

        let mut asked = 0;
        let result = store.add(&document("张三", classes), "", Some(&alice), |conflicts| {
            asked += 1;
            assert_eq!(conflicts.len(), 1);
            false
        });
        assert_eq!(asked, 1);
        match result {
            Err(ScheduleError::UserCancelled { conflicts }) => {
                assert_eq!(conflicts[0].course_a, "高等数学");
                assert_eq!(conflicts[0].course_b, "线性代数");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_self_conflict_confirmed_is_admitted() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        let classes = json!([
            {"period": "第一大节", "course_name": "A"},
            {"period": "第一大节", "course_name": "B"}
        ]);
        let added = store
            .add(&document("张三", classes), "", Some(&alice), |_| true)
            .unwrap();
        assert_eq!(added.acknowledged_conflicts.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_aborts_add() {
        let (mut store, backend) = open_store();
        let alice = CurrentUser::user("alice");
        backend.set_healthy(false);
        let result = store.add(&document("张三", math()), "", Some(&alice), never_called);
        assert!(matches!(result, Err(ScheduleError::Storage(_))));
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_remove_authorization() {
        let (mut store, backend) = open_store();
        let alice = CurrentUser::user("alice");
        let bob = CurrentUser::user("bob");
        let admin = CurrentUser::admin("admin");
        store.add(&document("甲", math()), "", Some(&alice), never_called).unwrap();
        store.add(&document("乙", math()), "", Some(&alice), never_called).unwrap();

        assert!(matches!(store.remove("甲", None), Err(ScheduleError::Unauthenticated)));
        assert!(matches!(
            store.remove("甲", Some(&bob)),
            Err(ScheduleError::Denied { .. })
        ));
        assert_eq!(store.len(), 2);

        assert!(store.remove("甲", Some(&alice)).unwrap());
        assert!(store.remove("乙", Some(&admin)).unwrap());
        assert!(store.is_empty());
        assert_eq!(backend.write_count(), 4);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut store, backend) = open_store();
        let admin = CurrentUser::admin("admin");
        assert!(!store.remove("nobody", Some(&admin)).unwrap());
        assert_eq!(backend.write_count(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_open_loads_persisted_collection() {
        let (mut store, backend) = open_store();
        let alice = CurrentUser::user("alice");
        store.add(&document("甲", math()), "", Some(&alice), never_called).unwrap();

        let reopened = ScheduleStore::open(Box::new(backend.clone())).unwrap();
        assert_eq!(reopened.all(), store.all());
    }

    #[test]
    fn test_open_ignores_unreadable_value() {
        let backend = LocalStore::with_value(SCHEDULES_KEY, json!({"not": "a list"}));
        let store = ScheduleStore::open(Box::new(backend)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_mutations() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        store.add(&document("甲", math()), "", Some(&alice), never_called).unwrap();
        let snapshot = store.snapshot();
        store.remove("甲", Some(&alice)).unwrap();

        assert_eq!(snapshot.schedules().len(), 1);
        assert_eq!(snapshot.revision(), 1);
        assert_eq!(store.snapshot().revision(), 2);
    }

    #[test]
    fn test_team_members_sorted_and_removable() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        let bob = CurrentUser::user("bob");
        store.add(&document("Zed", math()), "", Some(&alice), never_called).unwrap();
        store.add(&document("Amy", math()), "", Some(&bob), never_called).unwrap();

        let members = store.team_members();
        assert_eq!(members[0].name, "Amy");
        assert_eq!(members[1].name, "Zed");
        assert!(members[0].can_remove(Some(&bob)));
        assert!(!members[0].can_remove(Some(&alice)));
        assert!(!members[0].can_remove(None));
    }

    #[test]
    fn test_export_json_omits_uploader() {
        let (mut store, _) = open_store();
        let alice = CurrentUser::user("alice");
        store.add(&document("甲", math()), "", Some(&alice), never_called).unwrap();
        let exported = store.export_json().unwrap();
        assert!(!exported.contains("uploadedBy"));
        assert!(exported.contains("\"student_name\": \"甲\""));
    }
}
