//! Integration tests for the game API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Every test plays against a freshly seeded game.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use kanban_core::{Session, SessionEvent};
use kanban_rules::RulesConfig;
use kanban_server::router::build_router;
use kanban_server::state::AppState;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn make_test_state() -> Arc<AppState> {
    let mut session = Session::new(
        RulesConfig::default(),
        Decimal::new(10_000, 0),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
    );
    session.seed().unwrap();
    let state = Arc::new(AppState::new(session));
    // Seeding events are not interesting to the tests.
    let _ = state.handle.with(|s| s.drain_events()).await;
    state
}

async fn worker_named(state: &AppState, name: &str) -> Uuid {
    state
        .handle
        .read(|s| {
            s.workers()
                .find(|w| w.card.title == name)
                .map(|w| w.id.into_inner())
        })
        .await
        .unwrap()
}

async fn feature_titled(state: &AppState, title: &str) -> Uuid {
    state
        .handle
        .read(|s| {
            s.features()
                .find(|f| f.card.title == title)
                .map(|f| f.id.into_inner())
        })
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn get(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    send(state, Request::get(path).body(Body::empty()).unwrap()).await
}

async fn post(state: &Arc<AppState>, path: &str, body: &Value) -> (StatusCode, Value) {
    send(
        state,
        Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn put(state: &Arc<AppState>, path: &str, body: &Value) -> (StatusCode, Value) {
    send(
        state,
        Request::put(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_state() {
    let state = make_test_state().await;

    let (status, json) = get(&state, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["day"], 1);
    assert_eq!(json["date"], "2026-09-01");
    assert_eq!(json["money"], "10000");
    assert_eq!(json["workers"], 16);
    assert_eq!(json["features"], 8);
    assert_eq!(json["tasks"], 5);
}

#[tokio::test]
async fn test_get_boards() {
    let state = make_test_state().await;

    let (status, json) = get(&state, "/api/boards").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 4);
    assert_eq!(json["boards"][0]["board"], "Analysis");
    assert_eq!(json["boards"][0]["columns"][0]["column"]["id"], "backlog");
    assert_eq!(json["boards"][3]["board"], "Summary");
    assert_eq!(json["boards"][3]["read_only"], true);
}

#[tokio::test]
async fn test_list_workers_by_column() {
    let state = make_test_state().await;

    let (status, json) = get(&state, "/api/workers?column=analysis1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["workers"][0]["column_id"], "analysis1");

    let (status, _) = get(&state, "/api/workers?column=nowhere").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_worker_invalid_uuid() {
    let state = make_test_state().await;

    let (status, json) = get(&state, "/api/workers/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_get_worker_not_found() {
    let state = make_test_state().await;
    let missing = Uuid::now_v7();

    let (status, json) = get(&state, &format!("/api/workers/{missing}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_create_update_and_delete_feature() {
    let state = make_test_state().await;

    let (status, created) = post(
        &state,
        "/api/features",
        &json!({"title": "Audit Log", "story_points": 3, "priority": "High"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["column_id"], "backlog");
    assert_eq!(created["profit"], "1500");
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, updated) = put(
        &state,
        &format!("/api/features/{id}"),
        &json!({"title": "Audit Trail"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Audit Trail");

    let (status, _) = send(
        &state,
        Request::delete(format!("/api/features/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&state, &format!("/api/features/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_task_with_empty_title_is_rejected() {
    let state = make_test_state().await;

    let (status, _) = post(
        &state,
        "/api/tasks",
        &json!({"title": "  ", "column_id": "backend-backlog"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_illegal_relocation_is_not_allowed() {
    let state = make_test_state().await;
    let feature = feature_titled(&state, "Mobile App").await;
    let mut rx = state.subscribe();

    let (status, json) = post(
        &state,
        "/api/relocate",
        &json!({"entity_id": feature, "board": "Analysis", "column_id": "waiting"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["allowed"], false);

    let (status, json) = post(
        &state,
        "/api/relocate",
        &json!({"entity_id": feature, "board": "Summary", "column_id": "development"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["allowed"], false);

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_relocate_unknown_entity_is_not_found() {
    let state = make_test_state().await;

    let (status, _) = post(
        &state,
        "/api/relocate",
        &json!({"entity_id": Uuid::now_v7(), "board": "Analysis", "column_id": "analysis1"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_then_advance_day() {
    let state = make_test_state().await;
    let alex = worker_named(&state, "Alex Turner").await;
    let feature = feature_titled(&state, "User Authentication").await;

    let (status, json) = post(
        &state,
        "/api/assign",
        &json!({"work_item_id": feature, "worker_id": alex}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["allowed"], true);

    let (status, summary) = post(&state, "/api/advance-day", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["day"], 2);
    assert_eq!(summary["stages_completed"], 1);

    let (_, feature_json) = get(&state, &format!("/api/features/{feature}")).await;
    assert_eq!(feature_json["column_id"], "waiting");
    assert_eq!(feature_json["assignee"], Value::Null);
}

#[tokio::test]
async fn test_assign_worker_to_foreign_item_is_not_allowed() {
    let state = make_test_state().await;
    let tester = worker_named(&state, "Grace Lee").await;
    let feature = feature_titled(&state, "Real-time Chat").await;

    let (status, json) = post(
        &state,
        "/api/assign",
        &json!({"work_item_id": feature, "worker_id": tester}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["allowed"], false);
}

#[tokio::test]
async fn test_vacation_lifecycle() {
    let state = make_test_state().await;
    let emma = worker_named(&state, "Emma Davis").await;
    let path = format!("/api/workers/{emma}/vacation");

    let (status, _) = post(&state, &path, &json!({"days": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post(&state, &path, &json!({"days": 3})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OnVacation");

    let (status, json) = post(&state, &path, &json!({"days": 3})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);

    let (status, json) = post(
        &state,
        &format!("/api/workers/{emma}/end-vacation"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Active");
}

#[tokio::test]
async fn test_fire_and_rehire() {
    let state = make_test_state().await;
    let mark = worker_named(&state, "Mark Taylor").await;

    let (status, json) = post(&state, &format!("/api/workers/{mark}/fire"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Fired");

    let (status, _) = post(&state, &format!("/api/workers/{mark}/fire"), &json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = post(&state, &format!("/api/workers/{mark}/rehire"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Active");
}

#[tokio::test]
async fn test_send_to_development_from_backlog_conflicts() {
    let state = make_test_state().await;
    let feature = feature_titled(&state, "Search Functionality").await;

    let (status, _) = post(
        &state,
        &format!("/api/features/{feature}/send-to-development"),
        &json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_send_to_development_generates_tasks() {
    let state = make_test_state().await;
    let (_, created) = post(
        &state,
        "/api/features",
        &json!({"title": "Reports", "story_points": 5, "column_id": "ready-dev"}),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, json) = post(
        &state,
        &format!("/api/features/{id}/send-to-development"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);

    let (_, feature) = get(&state, &format!("/api/features/{id}")).await;
    assert_eq!(feature["column_id"], "development");
    let (_, backend) = get(&state, "/api/tasks?column=backend-backlog").await;
    assert_eq!(backend["count"], 2);
}

#[tokio::test]
async fn test_money_endpoints() {
    let state = make_test_state().await;

    let (status, json) = post(
        &state,
        "/api/money/add",
        &json!({"amount": "250", "description": "Bonus"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["balance"], "10250");
    assert_eq!(json["transaction"]["description"], "Bonus");

    let (status, _) = post(&state, "/api/money/add", &json!({"amount": "0"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&state, "/api/money").await;
    assert_eq!(json["count"], 1);

    let (status, json) = post(&state, "/api/money/set", &json!({"amount": "42"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["balance"], "42");
}

#[tokio::test]
async fn test_settings_and_achievements() {
    let state = make_test_state().await;

    let (status, json) = put(
        &state,
        "/api/settings",
        &json!({"summary_board_visible": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary_board_visible"], false);
    assert_eq!(json["ready_for_development_visible"], true);

    let (_, boards) = get(&state, "/api/boards").await;
    assert_eq!(boards["boards"][3]["visible"], false);

    let (status, json) = get(&state, "/api/achievements").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_restart_broadcasts_and_reseeds() {
    let state = make_test_state().await;
    let mut rx = state.subscribe();
    let _ = post(&state, "/api/advance-day", &json!({})).await;

    let (status, json) = post(&state, "/api/restart", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(
        events.first(),
        Some(SessionEvent::DayAdvanced { day: 2, .. })
    ));
    assert_eq!(events.last(), Some(&SessionEvent::GameRestarted { day: 1 }));

    let (_, state_json) = get(&state, "/api/state").await;
    assert_eq!(state_json["day"], 1);
    assert_eq!(state_json["workers"], 16);
}

#[tokio::test]
async fn test_events_serialize_with_tag() {
    let state = make_test_state().await;
    let mut rx = state.subscribe();

    let _ = post(&state, "/api/money/set", &json!({"amount": "5"})).await;

    let event = rx.recv().await.unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "money_changed");
    assert_eq!(json["balance"], "5");
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_test_state().await;

    let (status, _) = get(&state, "/api/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
