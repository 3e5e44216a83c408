use super::helpers::{
    CANONICAL_REPLY, FakeVisionModel, FilePart, data_url, expect_status, json_request,
    multipart_body, multipart_request, png_upload_body, read_json, send, spawn_app,
    spawn_app_with, spawn_app_with_disk_staging, build_config, tiny_jpeg_bytes, tiny_png_bytes,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn upload_accepts_jpeg_file() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let jpeg = tiny_jpeg_bytes();
    let (boundary, body) = multipart_body(
        &[],
        Some(FilePart {
            field: "image",
            file_name: "photo.JPG",
            content_type: "image/jpeg",
            bytes: &jpeg,
        }),
    );

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::OK).await;

    let sent = test.model.last_request().expect("model was not called");
    assert!(sent.image_data_url.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn upload_rejects_disallowed_type() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let (boundary, body) = multipart_body(
        &[],
        Some(FilePart {
            field: "image",
            file_name: "animation.gif",
            content_type: "image/gif",
            bytes: b"GIF89a\x01\x00\x01\x00",
        }),
    );

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::UNSUPPORTED_MEDIA_TYPE).await;
    assert_eq!(test.model.calls(), 0);
}

#[tokio::test]
async fn upload_rejects_content_that_is_not_an_image() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let (boundary, body) = multipart_body(
        &[],
        Some(FilePart {
            field: "image",
            file_name: "wound.png",
            content_type: "image/png",
            bytes: b"#!/bin/sh\necho not an image\n",
        }),
    );

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::UNSUPPORTED_MEDIA_TYPE).await;
}

#[tokio::test]
async fn upload_over_size_cap_is_payload_too_large() {
    let mut config = build_config();
    config.max_image_bytes = 16;
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));
    let (boundary, body) = png_upload_body();

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::PAYLOAD_TOO_LARGE).await;
    assert_eq!(test.model.calls(), 0);
}

#[tokio::test]
async fn upload_route_requires_multipart() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request(
        "/api/analyze/upload",
        json!({ "image": data_url("image/png", &tiny_png_bytes()) }),
    );

    let res = expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn base64_accepts_bare_payload() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let bare = data_url("image/png", &tiny_png_bytes())
        .trim_start_matches("data:image/png;base64,")
        .to_string();

    let res = send(&test.app, json_request("/api/analyze/base64", json!({ "image": bare }))).await;
    expect_status(res, StatusCode::OK).await;

    let sent = test.model.last_request().expect("model was not called");
    assert!(sent.image_data_url.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn base64_rejects_malformed_payload() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request(
        "/api/analyze/base64",
        json!({ "image": "data:image/png;base64,@@not base64@@" }),
    );

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
    assert_eq!(test.model.calls(), 0);
}

#[tokio::test]
async fn base64_rejects_declared_type_outside_allow_list() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));
    let req = json_request(
        "/api/analyze/base64",
        json!({ "image": data_url("image/svg+xml", &tiny_png_bytes()) }),
    );

    expect_status(send(&test.app, req).await, StatusCode::UNSUPPORTED_MEDIA_TYPE).await;
}

#[tokio::test]
async fn base64_without_image_is_missing_input() {
    let test = spawn_app(FakeVisionModel::replying(CANONICAL_REPLY));

    let res = send(&test.app, json_request("/api/analyze/base64", json!({ "image": "" }))).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
    assert_eq!(test.model.calls(), 0);
}

/// PNG data URL with the payload broken into short CRLF-separated lines.
fn line_wrapped_png_data_url(png: &[u8]) -> String {
    let url = data_url("image/png", png);
    let payload = url.trim_start_matches("data:image/png;base64,");
    let lines: Vec<&str> = payload
        .as_bytes()
        .chunks(16)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect();
    format!("data:image/png;base64,{}", lines.join("\r\n"))
}

#[tokio::test]
async fn base64_line_wrapped_image_at_the_cap_is_accepted() {
    let png = tiny_png_bytes();
    let mut config = build_config();
    config.max_image_bytes = png.len();
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));

    let req = json_request(
        "/api/analyze/base64",
        json!({ "image": line_wrapped_png_data_url(&png) }),
    );
    expect_status(send(&test.app, req).await, StatusCode::OK).await;
    assert_eq!(test.model.calls(), 1);
}

#[tokio::test]
async fn base64_line_wrapped_image_over_the_cap_is_payload_too_large() {
    let png = tiny_png_bytes();
    let mut config = build_config();
    config.max_image_bytes = png.len() - 1;
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));

    let req = json_request(
        "/api/analyze/base64",
        json!({ "image": line_wrapped_png_data_url(&png) }),
    );
    let res = send(&test.app, req).await;
    let body: Value = read_json(expect_status(res, StatusCode::PAYLOAD_TOO_LARGE).await).await;
    let expected = format!("Image is {} bytes", png.len());
    assert!(body["error"].as_str().unwrap().starts_with(&expected));
    assert_eq!(test.model.calls(), 0);
}

#[tokio::test]
async fn disk_staging_leaves_no_files_on_success() {
    let root = tempfile::tempdir().expect("tempdir");
    let dir = root.path().join("uploads");
    let test = spawn_app_with_disk_staging(FakeVisionModel::replying(CANONICAL_REPLY), dir.clone());
    let (boundary, body) = png_upload_body();

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::OK).await;

    assert_eq!(std::fs::read_dir(&dir).expect("upload dir").count(), 0);
}

#[tokio::test]
async fn disk_staging_leaves_no_files_on_failure() {
    let root = tempfile::tempdir().expect("tempdir");
    let dir = root.path().join("uploads");
    let test = spawn_app_with_disk_staging(FakeVisionModel::replying("not json at all"), dir.clone());
    let (boundary, body) = multipart_body(
        &[],
        Some(FilePart {
            field: "image",
            file_name: "wound.png",
            content_type: "image/png",
            bytes: b"plain text pretending to be a png",
        }),
    );

    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::UNSUPPORTED_MEDIA_TYPE).await;

    let (boundary, body) = png_upload_body();
    let res = send(&test.app, multipart_request("/api/analyze/upload", &boundary, body)).await;
    expect_status(res, StatusCode::BAD_GATEWAY).await;

    assert_eq!(std::fs::read_dir(&dir).expect("upload dir").count(), 0);
}

#[tokio::test]
async fn router_enforces_request_body_limit() {
    let mut config = build_config();
    config.max_body_bytes = 1024;
    let test = spawn_app_with(config, FakeVisionModel::replying(CANONICAL_REPLY));

    let req = json_request("/api/analyze/base64", json!({ "image": "A".repeat(4096) }));
    expect_status(send(&test.app, req).await, StatusCode::PAYLOAD_TOO_LARGE).await;
    assert_eq!(test.model.calls(), 0);
}
