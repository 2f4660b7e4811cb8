//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. The acting user is taken from the
//! `x-user-name` and `x-user-role` headers set by the authenticating proxy.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};

use super::dto::{
    AddScheduleRequest, AddScheduleResponse, CalendarQuery, ConflictEntry, ConflictsResponse,
    DayResponse, HealthResponse, TeamListResponse, TeamMemberDto, WeekResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{export_file_name, ActionResult};
use crate::models::{CurrentUser, Role};
use crate::services::{navigate, weekday_label, TeamView, ViewMode};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Header carrying the username of the acting user.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Header carrying the role of the acting user (`admin` or `user`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Read the acting user from request headers.
///
/// A missing or blank name means nobody is logged in.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Option<CurrentUser>, AppError> {
    let header_text = |name: &str| -> Result<Option<String>, AppError> {
        headers
            .get(name)
            .map(|value| {
                std::str::from_utf8(value.as_bytes())
                    .map(|s| s.trim().to_string())
                    .map_err(|_| AppError::BadRequest(format!("Header {} is not valid UTF-8", name)))
            })
            .transpose()
    };

    let Some(username) = header_text(USER_NAME_HEADER)?.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    let role = match header_text(USER_ROLE_HEADER)? {
        Some(role) if !role.is_empty() => role.parse::<Role>().map_err(AppError::BadRequest)?,
        _ => Role::default(),
    };

    Ok(Some(CurrentUser::new(username, role)))
}

fn team_view(state: &AppState) -> TeamView {
    let snapshot = state.store.read().snapshot();
    TeamView::from_snapshot(&snapshot)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store = state.store.read();
    let store_status = match store.health_check() {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
        schedules: store.len(),
    }))
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /v1/schedules
///
/// List the students with a schedule, sorted by name.
pub async fn list_schedules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<TeamListResponse> {
    let actor = actor_from_headers(&headers)?;
    let store = state.store.read();

    let members: Vec<TeamMemberDto> = store
        .team_members()
        .into_iter()
        .map(|member| TeamMemberDto {
            can_remove: member.can_remove(actor.as_ref()),
            name: member.name,
            uploaded_by: member.uploaded_by,
        })
        .collect();
    let total = members.len();

    Ok(Json(TeamListResponse {
        members,
        total,
        revision: store.revision(),
    }))
}

/// POST /v1/schedules
///
/// Upload a schedule. A schedule that conflicts with itself is rejected with
/// 409 unless the request sets `confirm_conflicts`.
pub async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddScheduleRequest>,
) -> Result<(StatusCode, Json<AddScheduleResponse>), AppError> {
    let actor = actor_from_headers(&headers)?;
    let document = request.document_text();

    let result = state.store.write().add(
        &document,
        &request.student_name,
        actor.as_ref(),
        |_| request.confirm_conflicts,
    );
    let summary = ActionResult::from_add(&result);
    let added = result?;

    let status = if added.replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(AddScheduleResponse {
            result: summary,
            replaced: added.replaced,
            acknowledged_conflicts: added.acknowledged_conflicts,
        }),
    ))
}

/// DELETE /v1/schedules/{student_name}
///
/// Removing a student that is not on the team succeeds without a write.
pub async fn delete_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(student_name): Path<String>,
) -> HandlerResult<ActionResult> {
    let actor = actor_from_headers(&headers)?;

    let result = state.store.write().remove(&student_name, actor.as_ref());
    let summary = ActionResult::from_remove(&student_name, &result);
    result?;

    Ok(Json(summary))
}

/// GET /v1/export
///
/// Download the whole team collection as a JSON attachment.
pub async fn export_schedules(State(state): State<AppState>) -> impl IntoResponse {
    let exported = state.store.read().export();
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(today()));

    ([(header::CONTENT_DISPOSITION, disposition)], Json(exported))
}

// =============================================================================
// Team Calendar
// =============================================================================

/// GET /v1/conflicts
///
/// Every slot in which a student is booked into more than one class.
pub async fn get_conflicts(State(state): State<AppState>) -> HandlerResult<ConflictsResponse> {
    let view = team_view(&state);

    Ok(Json(ConflictsResponse {
        revision: view.revision(),
        conflicts: view.conflicts().iter().cloned().map(ConflictEntry::from).collect(),
    }))
}

/// GET /v1/week?date=YYYY-MM-DD&q=
pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> HandlerResult<WeekResponse> {
    let anchor = query.date.unwrap_or_else(today);
    let view = team_view(&state);

    Ok(Json(WeekResponse {
        revision: view.revision(),
        periods: view.periods().to_vec(),
        days: view.week_grid(anchor, query.q.as_deref().unwrap_or_default()),
        previous: navigate(anchor, ViewMode::Week, -1),
        next: navigate(anchor, ViewMode::Week, 1),
    }))
}

/// GET /v1/day?date=YYYY-MM-DD&q=
pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> HandlerResult<DayResponse> {
    let date = query.date.unwrap_or_else(today);
    let view = team_view(&state);

    Ok(Json(DayResponse {
        revision: view.revision(),
        date,
        day_of_week: weekday_label(date).to_string(),
        cells: view.day_grid(date, query.q.as_deref().unwrap_or_default()),
        previous: navigate(date, ViewMode::Day, -1),
        next: navigate(date, ViewMode::Day, 1),
    }))
}
