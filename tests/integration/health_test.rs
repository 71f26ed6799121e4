//! Integration tests for the service, health and realtime HTTP endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

use isavs_core::config::AppConfig;

use helpers::{AUTH, TestApp};

#[tokio::test]
async fn test_health_check_body_is_exact() {
    let app = TestApp::new();

    let resp = app.request("GET", "/health", None, &[]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "status": "healthy", "service": "ISAVS" }));
}

#[tokio::test]
async fn test_health_check_is_stable() {
    let app = TestApp::new();

    let first = app.request("GET", "/health", None, &[]).await;
    let second = app.request("GET", "/health", None, &[]).await;
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_root_describes_service() {
    let app = TestApp::new();

    let resp = app.request("GET", "/", None, &[]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["version"], "1.0.0");
    assert_eq!(resp.body["docs"], "/docs");
    assert_eq!(resp.body["health"], "/health");
    assert!(
        resp.body["service"]
            .as_str()
            .is_some_and(|s| s.starts_with("ISAVS"))
    );
}

#[tokio::test]
async fn test_stats_without_dashboards() {
    let app = TestApp::new();

    let resp = app.request("GET", "/api/realtime/stats", None, &[AUTH]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["data"]["active_connections"], 0);
    assert_eq!(resp.body["data"]["connections"], json!([]));
}

#[tokio::test]
async fn test_publish_without_audience_reports_zero() {
    let app = TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "attendance_update", "data": { "student_id": "S1" } })),
            &[AUTH],
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"], json!({ "delivered": 0, "failed": 0 }));

    let stats = app.request("GET", "/api/realtime/stats", None, &[AUTH]).await;
    assert_eq!(stats.body["data"]["metrics"]["broadcasts"], 1);
}

#[tokio::test]
async fn test_publish_rejects_non_object_data() {
    let app = TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "anomaly_alert", "data": "late" })),
            &[AUTH],
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_publish_rejects_unknown_event_type() {
    let app = TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "roll_call", "data": {} })),
            &[AUTH],
        )
        .await;
    assert!(resp.status.is_client_error());
}

#[tokio::test]
async fn test_publish_without_token_is_rejected() {
    let app = TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "anomaly_alert", "data": { "student_id": "S1" } })),
            &[],
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "UNAUTHORIZED");

    let stats = app.request("GET", "/api/realtime/stats", None, &[AUTH]).await;
    assert_eq!(stats.body["data"]["metrics"]["broadcasts"], 0);
}

#[tokio::test]
async fn test_publish_with_wrong_token_is_rejected() {
    let app = TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "anomaly_alert", "data": {} })),
            &[("Authorization", "Bearer not-the-token")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "anomaly_alert", "data": {} })),
            &[("Authorization", helpers::PUBLISH_TOKEN)],
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stats_require_token() {
    let app = TestApp::new();

    let resp = app.request("GET", "/api/realtime/stats", None, &[]).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_realtime_routes_unmounted_without_token() {
    let app = TestApp::with_config(AppConfig::default());

    let resp = app.request("GET", "/api/realtime/stats", None, &[AUTH]).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .request(
            "POST",
            "/api/realtime/events",
            Some(json!({ "type": "anomaly_alert", "data": {} })),
            &[AUTH],
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let health = app.request("GET", "/health", None, &[]).await;
    assert_eq!(health.status, StatusCode::OK);
}
