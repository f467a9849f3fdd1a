//! Integration tests for the health endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "status": "healthy", "service": "booking" })
    );
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["lock_coordinator"], "connected");
    assert_eq!(response.body["observed_events"], 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
