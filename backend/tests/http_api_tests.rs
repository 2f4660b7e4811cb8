//! End-to-end tests of the REST API against an in-memory store.
#![cfg(feature = "http-server")]

mod support;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use support::{class, day, document, SAMPLE_SCHEDULE};
use team_schedule::db::LocalStore;
use team_schedule::http::{create_router, AppState};
use team_schedule::services::ScheduleStore;
use tower::ServiceExt;

fn app() -> Router {
    let store = ScheduleStore::open(Box::new(LocalStore::new())).unwrap();
    create_router(AppState::new(store))
}

fn request(method: Method, uri: &str, user: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, role)) = user {
        builder = builder.header("x-user-name", name).header("x-user-role", role);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn upload(document: &str, confirm: bool) -> Value {
    json!({ "document": document, "confirm_conflicts": confirm })
}

fn conflicting_document() -> String {
    document(
        "张三",
        "2024-2025",
        vec![day(
            "09-02",
            "一",
            vec![
                class("第一大节", "高等数学", "李老师", Some("A101")),
                class("第一大节", "线性代数", "王老师", Some("A102")),
            ],
        )],
    )
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "connected");
    assert_eq!(body["schedules"], 0);
}

#[tokio::test]
async fn test_upload_requires_user() {
    let app = app();
    let (status, body) = send(
        &app,
        request(Method::POST, "/v1/schedules", None, Some(upload(SAMPLE_SCHEDULE, false))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_upload_then_replace() {
    let app = app();
    let alice = Some(("alice", "user"));

    let (status, body) = send(
        &app,
        request(Method::POST, "/v1/schedules", alice, Some(upload(SAMPLE_SCHEDULE, false))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["student_name"], "张三");
    assert_eq!(body["replaced"], false);

    // Document given as an object instead of text.
    let object: Value = serde_json::from_str(SAMPLE_SCHEDULE).unwrap();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/v1/schedules",
            alice,
            Some(json!({ "document": object })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replaced"], true);

    let (_, body) = send(&app, request(Method::GET, "/v1/schedules", alice, None)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["members"][0]["uploaded_by"], "alice");
    assert_eq!(body["members"][0]["can_remove"], true);
}

#[tokio::test]
async fn test_malformed_upload() {
    let app = app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/v1/schedules",
            Some(("alice", "user")),
            Some(upload("{\"student_name\": \"x\"}", false)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");
}

#[tokio::test]
async fn test_self_conflict_needs_confirmation() {
    let app = app();
    let alice = Some(("alice", "user"));

    let (status, body) = send(
        &app,
        request(Method::POST, "/v1/schedules", alice, Some(upload(&conflicting_document(), false))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USER_CANCELLED");
    assert!(body["details"].as_str().unwrap().contains("线性代数"));

    let (status, body) = send(
        &app,
        request(Method::POST, "/v1/schedules", alice, Some(upload(&conflicting_document(), true))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["acknowledged_conflicts"][0]["course_b"], "线性代数");

    let (_, body) = send(&app, request(Method::GET, "/v1/conflicts", None, None)).await;
    assert_eq!(body["conflicts"][0]["key"], "张三-2024-09-02-第一大节");
    assert_eq!(body["conflicts"][0]["date"], "2024-09-02");
}

#[tokio::test]
async fn test_delete_authorization() {
    let app = app();
    send(
        &app,
        request(
            Method::POST,
            "/v1/schedules",
            Some(("alice", "user")),
            Some(upload(SAMPLE_SCHEDULE, false)),
        ),
    )
    .await;

    let uri = "/v1/schedules/%E5%BC%A0%E4%B8%89";
    let (status, _) = send(&app, request(Method::DELETE, uri, Some(("bob", "user")), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request(Method::DELETE, uri, Some(("root", "admin")), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, request(Method::DELETE, uri, Some(("root", "admin")), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("student_name").is_none());
}

#[tokio::test]
async fn test_delete_unknown_student_still_needs_user() {
    let app = app();
    let (status, body) = send(&app, request(Method::DELETE, "/v1/schedules/nobody", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_unknown_role_is_bad_request() {
    let app = app();
    let (status, _) = send(
        &app,
        request(Method::GET, "/v1/schedules", Some(("alice", "superuser")), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_week_and_day_views() {
    let app = app();
    send(
        &app,
        request(
            Method::POST,
            "/v1/schedules",
            Some(("alice", "user")),
            Some(upload(SAMPLE_SCHEDULE, false)),
        ),
    )
    .await;

    let (status, body) = send(&app, request(Method::GET, "/v1/week?date=2024-09-04", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"].as_array().unwrap().len(), 7);
    assert_eq!(body["days"][0]["date"], "2024-09-02");
    assert_eq!(body["previous"], "2024-08-28");
    assert_eq!(body["next"], "2024-09-11");
    assert_eq!(body["periods"][3], "晚间");

    let (_, body) = send(
        &app,
        request(Method::GET, "/v1/day?date=2024-09-02&q=smith", None, None),
    )
    .await;
    assert_eq!(body["day_of_week"], "一");
    let cells = body["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 4);
    assert!(cells[0]["groups"].as_array().unwrap().is_empty());
    assert_eq!(cells[2]["groups"][0]["course_name"], "大学英语");
    assert_eq!(cells[2]["groups"][0]["students"][0], "张三");
}

#[tokio::test]
async fn test_invalid_calendar_date_is_rejected() {
    let app = app();
    let response = app
        .clone()
        .oneshot(request(Method::GET, "/v1/day?date=2024-02-30", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_attachment() {
    let app = app();
    send(
        &app,
        request(
            Method::POST,
            "/v1/schedules",
            Some(("alice", "user")),
            Some(upload(SAMPLE_SCHEDULE, false)),
        ),
    )
    .await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/v1/export", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"team_schedule_"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["student_name"], "张三");
    assert!(body[0].get("uploadedBy").is_none());
}
