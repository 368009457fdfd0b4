//! Integration tests for the HTTP facade.
//!
//! These drive the full router (middleware included) with in-process
//! requests against the checked-in extracts under `testdata/`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use regserve::{build_router, ServerConfig, ServerState};

fn test_config() -> ServerConfig {
    ServerConfig {
        data_files: vec!["testdata/tz_test.csv".into(), "testdata/tz_test1.csv".into()],
        ..Default::default()
    }
}

fn test_router(config: ServerConfig) -> axum::Router {
    let state = Arc::new(ServerState::new(config).expect("state"));
    build_router(state).expect("router")
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn root_route_reports_service_info() {
    let (status, body) = get(test_router(test_config()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "regserve");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_reports_indexed_registrations() {
    let (status, body) = get(test_router(test_config()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    // Four distinct plates across the two extracts.
    assert_eq!(body["registrations"], 4);
}

#[tokio::test]
async fn version_route_returns_crate_version() {
    let (status, body) = get(test_router(test_config()), "/admin/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn search_requires_tname() {
    let (status, body) = get(test_router(test_config()), "/search?snumber=AA3777PP").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn search_requires_snumber() {
    let (status, body) = get(test_router(test_config()), "/search?tname=tz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn frontend_health_probe_answers_unauthorized() {
    let (status, _body) = get(test_router(test_config()), "/search?tname=foo").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn search_returns_one_record_per_source_file() {
    let (status, body) = get(
        test_router(test_config()),
        "/search?tname=tz&snumber=AA3777PP",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = body["body"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    // File-processing order: tz_test.csv first, then tz_test1.csv.
    assert_eq!(records[0]["OPER_CODE"], "315");
    assert_eq!(records[1]["OPER_CODE"], "309");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn search_unknown_registration_returns_empty_body() {
    let (status, body) = get(
        test_router(test_config()),
        "/search?tname=tz&snumber=ZZ0000ZZ",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = get(test_router(test_config()), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn responses_carry_cors_and_request_id_headers() {
    let router = test_router(test_config());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn pinned_frontend_origin_is_echoed() {
    let config = ServerConfig {
        frontend_origin: "https://data-entry.example.com".to_string(),
        ..test_config()
    };
    let router = test_router(config);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "https://data-entry.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://data-entry.example.com")
    );
}

#[tokio::test]
async fn caller_supplied_request_id_is_preserved() {
    let router = test_router(test_config());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-correlation-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("test-correlation-id")
    );
}

#[tokio::test]
async fn startup_fails_on_missing_extract() {
    let config = ServerConfig {
        data_files: vec!["testdata/does_not_exist.csv".into()],
        ..Default::default()
    };
    assert!(ServerState::new(config).is_err());
}
