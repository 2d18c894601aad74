//! Integration tests for the collaboration endpoints.
//!
//! Drive the full router (production middleware stack included) with
//! in-process requests and assert on the JSON envelopes.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::test_app;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Test: health endpoint reports ok
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ws_connections"], 0);
}

// ---------------------------------------------------------------------------
// Test: acquiring a document lock succeeds and shows in the snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn acquire_document_lock_succeeds() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/collaboration/locks/acquire",
            json!({
                "document_id": "doc-1",
                "level": "DOCUMENT_LOCK",
                "user_login_name": "jane",
                "user_name": "Jane Doe",
                "session_id": "s1",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["operation"], "ACQUIRE");

    let response = app
        .oneshot(get("/api/v1/collaboration/locks/doc-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["user_login_name"], "jane");
}

// ---------------------------------------------------------------------------
// Test: a competing acquisition is a 200 with success = false
// ---------------------------------------------------------------------------

#[tokio::test]
async fn competing_acquisition_is_denied_not_an_error() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/api/v1/collaboration/locks/acquire",
            json!({
                "document_id": "doc-1",
                "level": "DOCUMENT_LOCK",
                "user_login_name": "jane",
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post(
            "/api/v1/collaboration/locks/acquire",
            json!({
                "document_id": "doc-1",
                "level": "DOCUMENT_LOCK",
                "user_login_name": "john",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], false);
    // The snapshot names the current holder.
    assert_eq!(body["data"]["current_locks"][0]["user_login_name"], "jane");
}

// ---------------------------------------------------------------------------
// Test: a missing required argument is a 400 validation error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_argument_is_a_validation_error() {
    let app = test_app();

    let response = app
        .oneshot(post(
            "/api/v1/collaboration/locks/acquire",
            json!({
                "document_id": "",
                "level": "DOCUMENT_LOCK",
                "user_login_name": "jane",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: release round-trip clears the snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_clears_the_snapshot() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/api/v1/collaboration/locks/acquire",
            json!({
                "document_id": "doc-1",
                "level": "ELEMENT_LOCK",
                "element_id": "art-1",
                "user_login_name": "jane",
                "session_id": "s1",
            }),
        ))
        .await
        .unwrap();

    // Release without knowing the session — the asymmetric match finds it.
    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/collaboration/locks/release",
            json!({
                "document_id": "doc-1",
                "level": "ELEMENT_LOCK",
                "element_id": "art-1",
                "user_login_name": "jane",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["operation"], "RELEASE");

    let response = app
        .oneshot(get("/api/v1/collaboration/locks/doc-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: presence join is idempotent over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn presence_join_is_idempotent() {
    let app = test_app();

    let join = json!({
        "session_id": "s1",
        "presenter_id": "p1",
        "user": { "login": "jane", "name": "Jane Doe", "entity": null, "email": null },
        "document_id": "doc-1",
        "element_id": null,
        "info_type": "DOCUMENT_INFO",
    });

    let response = app
        .clone()
        .oneshot(post("/api/v1/collaboration/presence/join", join.clone()))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["operation"], "STORE");

    let response = app
        .clone()
        .oneshot(post("/api/v1/collaboration/presence/join", join))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["data"]["operation"], "EXISTS");

    let response = app
        .oneshot(get("/api/v1/collaboration/presence/doc-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: presence leave removes the record
// ---------------------------------------------------------------------------

#[tokio::test]
async fn presence_leave_removes_record() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/api/v1/collaboration/presence/join",
            json!({
                "session_id": "s1",
                "presenter_id": "p1",
                "user": { "login": "jane", "name": null, "entity": null, "email": null },
                "document_id": "doc-1",
                "element_id": "art-1",
                "info_type": "ELEMENT_INFO",
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/collaboration/presence/leave",
            json!({
                "presenter_id": "p1",
                "document_id": "doc-1",
                "element_id": "art-1",
                "info_type": "ELEMENT_INFO",
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["success"], true);

    let response = app
        .oneshot(get("/api/v1/collaboration/presence"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
