//! Service layer for schedule management and team views.
//!
//! This module sits between the persistence layer and the HTTP API.
//! [`schedule_store`] owns the admitted schedules and implements upload and
//! removal; [`team_view`] derives the read-only calendar from a snapshot.

pub mod schedule_store;
pub mod team_view;

pub use schedule_store::{AddedSchedule, ScheduleSnapshot, ScheduleStore, TeamMember, SCHEDULES_KEY};
pub use team_view::{
    filter_occurrences, navigate, week_of, weekday_label, DayColumn, GroupCard, PeriodCell,
    TeamView, ViewMode,
};
