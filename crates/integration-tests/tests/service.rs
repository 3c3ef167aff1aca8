//! Greeting, health checks and request ids.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;

use bazaar_integration_tests::TestApp;

#[tokio::test]
async fn test_greeting() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "Hello from Bazaar!");
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new();

    assert_eq!(app.get("/health").await.status, StatusCode::OK);
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();

    assert_eq!(app.get("/nope").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_every_response_carries_a_request_id() {
    let app = TestApp::new();

    let ok = app.get("/health").await;
    let missing = app.get("/nope").await;

    let first = ok.headers.get("x-request-id").unwrap();
    let second = missing.headers.get("x-request-id").unwrap();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}
