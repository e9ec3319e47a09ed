//! End-to-end HTTP tests: the real router over an in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use futureme_api::{
    adapters::MemoryStore,
    config::Config,
    web::{router, state::AppState},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn setup() -> Router {
    let config = Config::from_lookup(|_| None).unwrap();
    let state = AppState::new(Arc::new(config), Arc::new(MemoryStore::new()));
    router(Arc::new(state))
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

// ── System ──

#[tokio::test]
async fn root_reports_liveness() {
    let r = setup();
    let (s, body) = call(&r, "GET", "/", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["message"], "FutureMe API is running");
}

#[tokio::test]
async fn diagnostics_report_store_and_settings() {
    let r = setup();
    let (s, body) = call(&r, "GET", "/test", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["store"], "memory");
    assert_eq!(body["connection_status"], "Not Connected");
    assert_eq!(body["database"], "Not Available (records kept in memory)");
    assert_eq!(body["database_url"], "Not Set");
    assert_eq!(body["collections"], json!([]));
}

// ── Auth ──

#[tokio::test]
async fn register_then_login() {
    let r = setup();
    let (s, body) = call(
        &r,
        "POST",
        "/api/auth/register",
        Some(json!({ "email": "a@x.com", "password": "p", "name": null })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["user"]["name"], "a");
    assert_eq!(body["token"], body["user"]["id"]);
    assert!(body["user"].get("password_hash").is_none());

    let (s, login) = call(
        &r,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "a@x.com", "password": "p" })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(login["user"]["id"], body["user"]["id"]);
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let r = setup();
    let req = json!({ "email": "dup@x.com", "password": "p" });
    let (s, _) = call(&r, "POST", "/api/auth/register", Some(req.clone())).await;
    assert_eq!(s, StatusCode::OK);

    let (s, body) = call(&r, "POST", "/api/auth/register", Some(req)).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let r = setup();
    call(
        &r,
        "POST",
        "/api/auth/register",
        Some(json!({ "email": "w@x.com", "password": "right" })),
    )
    .await;

    let (s, body) = call(
        &r,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "w@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn google_sign_in_reuses_the_account() {
    let r = setup();
    let (s, first) = call(&r, "POST", "/api/auth/google", Some(json!({ "id_token": "qwerty-1" }))).await;
    assert_eq!(s, StatusCode::OK);
    let (_, second) = call(&r, "POST", "/api/auth/google", Some(json!({ "id_token": "qwerty-2" }))).await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
    assert_eq!(first["user"]["email"], "qwerty@googleuser.dev");
}

// ── Vision ──

#[tokio::test]
async fn vision_is_created_and_fetched() {
    let r = setup();
    let (s, empty) = call(&r, "GET", "/api/vision?user_id=u1", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(empty, json!({}));

    let (s, created) = call(
        &r,
        "POST",
        "/api/vision",
        Some(json!({
            "user_id": "u1",
            "career": "Engineer",
            "lifestyle": "Balanced",
            "timeline": "5 years"
        })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(created["milestones"].as_array().unwrap().len(), 4);
    let summary = created["summary"].as_str().unwrap();
    assert!(summary.contains("Engineer") && summary.contains("5 years"));
    assert!(created["created_at"].as_str().unwrap().ends_with('Z'));
    assert!(created.get("_id").is_none());

    let (_, latest) = call(&r, "GET", "/api/vision?user_id=u1", None).await;
    assert_eq!(latest, created);
}

// ── Goals ──

#[tokio::test]
async fn goal_lifecycle() {
    let r = setup();
    let (s, list) = call(&r, "GET", "/api/goals?user_id=u1", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (s, goal) = call(
        &r,
        "POST",
        "/api/goals",
        Some(json!({
            "user_id": "u1",
            "title": "Read 12 books",
            "description": "One a month",
            "category": "growth"
        })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(goal["progress"], 0);
    assert_eq!(goal["target_date"], Value::Null);
    let id = goal["id"].as_str().unwrap().to_string();

    let (s, updated) = call(
        &r,
        "PUT",
        &format!("/api/goals/{}", id),
        Some(json!({ "progress": 50 })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(updated["progress"], 50);
    assert_eq!(updated["title"], "Read 12 books");
    assert_eq!(updated["description"], "One a month");
    assert_eq!(updated["category"], "growth");
    assert_eq!(updated["created_at"], goal["created_at"]);

    let (_, list) = call(&r, "GET", "/api/goals?user_id=u1", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());

    let (s, deleted) = call(&r, "DELETE", &format!("/api/goals/{}", id), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(deleted, json!({ "ok": true }));

    let (s, body) = call(&r, "DELETE", &format!("/api/goals/{}", id), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Goal not found");
}

#[tokio::test]
async fn out_of_range_progress_is_unprocessable() {
    let r = setup();
    let (s, body) = call(
        &r,
        "POST",
        "/api/goals",
        Some(json!({ "user_id": "u1", "title": "Overachieve", "progress": 150 })),
    )
    .await;
    assert_eq!(s, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "progress");

    let (_, list) = call(&r, "GET", "/api/goals?user_id=u1", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_goal_bodies_get_a_json_error_naming_the_field() {
    let r = setup();
    let (s, body) = call(&r, "POST", "/api/goals", Some(json!({ "user_id": "u1" }))).await;
    assert_eq!(s, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("title"));
    assert_eq!(body["field"], "title");

    let (s, body) = call(
        &r,
        "POST",
        "/api/goals",
        Some(json!({ "user_id": "u1", "title": "Run", "progress": "lots" })),
    )
    .await;
    assert_eq!(s, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("progress"));

    let (_, list) = call(&r, "GET", "/api/goals?user_id=u1", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn missing_user_query_gets_a_json_error() {
    let r = setup();
    for uri in ["/api/goals", "/api/vision"] {
        let (s, body) = call(&r, "GET", uri, None).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "user_id");
        assert!(body["detail"].as_str().unwrap().contains("user_id"));
    }
}

#[tokio::test]
async fn updating_an_unknown_goal_is_not_found() {
    let r = setup();
    let ghost = futureme_core::DocumentId::generate();
    let (s, _) = call(
        &r,
        "PUT",
        &format!("/api/goals/{}", ghost),
        Some(json!({ "title": "Nope" })),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (s, _) = call(&r, "PUT", "/api/goals/garbage", Some(json!({ "title": "Nope" }))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
}

// ── Chat ──

#[tokio::test]
async fn chat_returns_the_reflective_reply() {
    let r = setup();
    let (s, body) = call(
        &r,
        "POST",
        "/api/chat",
        Some(json!({ "user_id": "u1", "message": "How do I start?" })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().starts_with("I hear you."));
}
