mod common;

use axum::http::StatusCode;
use common::{empty_request, memory_router, send};
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_works() {
    let app = memory_router();

    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "person-service");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = memory_router();

    let response = app.oneshot(empty_request("GET", "/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    let app = memory_router();

    // Generate at least one recorded request first.
    send(&app, empty_request("GET", "/persons")).await;

    let response = app
        .oneshot(empty_request("GET", "/metrics"))
        .await
        .unwrap();

    assert!(response.status().is_success());

    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type");
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = memory_router();

    let response = app
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
