use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use wound_api::{
    domain::assessment::errors::AnalysisError,
    infrastructure::vision::{
        openai_client::OpenAiVisionClient,
        traits::{VisionModel, VisionRequest},
    },
};

type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

/// Local stand-in for the chat-completions endpoint. Returns the base URL and
/// a slot holding the last request it received.
async fn spawn_upstream(status: StatusCode, body: Value, delay: Duration) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));
    let slot = captured.clone();

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(request): Json<Value>| {
            let slot = slot.clone();
            let body = body.clone();
            async move {
                *slot.lock().await = Some((headers, request));
                tokio::time::sleep(delay).await;
                (status, Json(body)).into_response()
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });

    (format!("http://{}/v1", addr), captured)
}

fn request() -> VisionRequest {
    VisionRequest {
        model: "gpt-4o".into(),
        prompt: "Describe the wound as JSON.".into(),
        image_data_url: "data:image/png;base64,iVBORw0KGgo=".into(),
        image_detail: "high".into(),
        temperature: 0.3,
        max_tokens: 2000,
    }
}

fn client(base_url: &str, timeout: Duration) -> OpenAiVisionClient {
    OpenAiVisionClient::new(Some("sk-test-key".into()), base_url, timeout).expect("client")
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

#[tokio::test]
async fn sends_chat_completion_and_returns_content() {
    let (base_url, captured) =
        spawn_upstream(StatusCode::OK, completion("{\"etiology\":\"burn\"}"), Duration::ZERO).await;

    let text = client(&base_url, Duration::from_secs(5))
        .complete(&request())
        .await
        .expect("completion");
    assert_eq!(text, "{\"etiology\":\"burn\"}");

    let (headers, body) = captured.lock().await.clone().expect("request captured");
    assert_eq!(headers["authorization"], "Bearer sk-test-key");
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 2000);
    let content = &body["messages"][0]["content"];
    assert_eq!(content[0]["type"], "text");
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(content[1]["image_url"]["detail"], "high");
}

#[tokio::test]
async fn cannot_assist_api_error_becomes_refusal() {
    let (base_url, _) = spawn_upstream(
        StatusCode::BAD_REQUEST,
        json!({ "error": {
            "message": "Sorry, I can't assist with that request.",
            "type": "invalid_request_error",
            "code": "content_policy_violation"
        }}),
        Duration::ZERO,
    )
    .await;

    let err = client(&base_url, Duration::from_secs(5))
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ModerationRefusal));
}

#[tokio::test]
async fn api_error_keeps_status_type_and_code() {
    let (base_url, _) = spawn_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": {
            "message": "Rate limit reached",
            "type": "requests",
            "code": "rate_limit_exceeded"
        }}),
        Duration::ZERO,
    )
    .await;

    let err = client(&base_url, Duration::from_secs(5))
        .complete(&request())
        .await
        .unwrap_err();
    match err {
        AnalysisError::UpstreamCallFailure { status, kind, code, .. } => {
            assert_eq!(status, Some(429));
            assert_eq!(kind.as_deref(), Some("requests"));
            assert_eq!(code.as_deref(), Some("rate_limit_exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_upstream_failure() {
    let (base_url, _) =
        spawn_upstream(StatusCode::BAD_GATEWAY, json!("gateway down"), Duration::ZERO).await;

    let err = client(&base_url, Duration::from_secs(5))
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::UpstreamCallFailure { status: Some(502), .. }
    ));
}

#[tokio::test]
async fn structured_refusal_field_becomes_refusal() {
    let (base_url, _) = spawn_upstream(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": null, "refusal": "I can't help with that." } }] }),
        Duration::ZERO,
    )
    .await;

    let err = client(&base_url, Duration::from_secs(5))
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ModerationRefusal));
}

#[tokio::test]
async fn slow_upstream_times_out_without_retry() {
    let (base_url, _) =
        spawn_upstream(StatusCode::OK, completion("{}"), Duration::from_secs(5)).await;

    let err = client(&base_url, Duration::from_millis(200))
        .complete(&request())
        .await
        .unwrap_err();
    match err {
        AnalysisError::UpstreamCallFailure { kind, .. } => {
            assert_eq!(kind.as_deref(), Some("timeout"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let (base_url, captured) = spawn_upstream(StatusCode::OK, completion("{}"), Duration::ZERO).await;
    let client = OpenAiVisionClient::new(None, base_url, Duration::from_secs(5)).expect("client");

    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::CredentialMissing));
    assert!(captured.lock().await.is_none());
}
