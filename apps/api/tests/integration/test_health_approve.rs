use super::helpers::{
    CANONICAL_REPLY, FakeVisionModel, build_config, expect_status, json_request, read_json, send,
    spawn_app, spawn_app_with,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

#[tokio::test]
async fn health_reports_redacted_key() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));

    let res = expect_status(send(&test.app, get("/api/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Wound Analysis API is running");
    assert_eq!(body["hasApiKey"], true);
    assert_eq!(body["apiKeyPrefix"], "sk-t***");
    assert_eq!(body["model"], "gpt-4o");
    assert!(!body.to_string().contains("0123456789"));
}

#[tokio::test]
async fn health_without_key_reports_not_set() {
    let mut config = build_config();
    config.openai_api_key = None;
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));

    let res = expect_status(send(&test.app, get("/api/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["hasApiKey"], false);
    assert_eq!(body["apiKeyPrefix"], "NOT SET");
}

#[tokio::test]
async fn approve_echoes_diagnosis_with_generated_id() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request(
        "/api/analyze/approve",
        json!({
            "diagnosis": { "etiology": "venous ulcer", "severity": "moderate" },
            "notes": "Confirmed at bedside",
            "timestamp": "2024-05-01T10:00:00.000Z"
        }),
    );

    let res = expect_status(send(&test.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Diagnosis approved successfully");
    assert_eq!(body["approval"]["diagnosis"]["etiology"], "venous ulcer");
    assert_eq!(body["approval"]["notes"], "Confirmed at bedside");
    assert_eq!(body["approval"]["timestamp"], "2024-05-01T10:00:00.000Z");
    assert_eq!(body["approval"]["status"], "approved");
    assert!(body["approval"]["id"].as_str().unwrap_or("").starts_with("approval-"));
    assert_eq!(test.model.calls(), 0);
}

#[tokio::test]
async fn approve_fills_in_server_timestamp() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request("/api/analyze/approve", json!({ "diagnosis": {} }));

    let res = expect_status(send(&test.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    let timestamp = body["approval"]["timestamp"].as_str().expect("timestamp");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn approve_rejects_overlong_notes() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request(
        "/api/analyze/approve",
        json!({ "diagnosis": {}, "notes": "n".repeat(5001) }),
    );

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn approve_rejects_malformed_json() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze/approve")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("failed to build request");

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn unknown_api_route_is_not_found_outside_production() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let res = send(&test.app, get("/api/unknown")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn production_serves_static_bundle_with_spa_fallback() {
    let root = tempfile::tempdir().expect("tempdir");
    std::fs::write(root.path().join("index.html"), "<html>wound ui</html>").expect("write index");

    let mut config = build_config();
    config.production = true;
    config.static_dir = root.path().to_path_buf();
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));

    let res = expect_status(send(&test.app, get("/review/123")).await, StatusCode::OK).await;
    let body = super::helpers::read_text(res).await;
    assert!(body.contains("wound ui"));

    let res = send(&test.app, get("/api/health")).await;
    assert_eq!(res.status(), StatusCode::OK);
}
