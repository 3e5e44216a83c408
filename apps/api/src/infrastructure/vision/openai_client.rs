use super::traits::{VisionModel, VisionRequest};
use crate::{
    domain::assessment::errors::AnalysisError,
    infrastructure::parsing::{json_recovery::snippet, refusal::mentions_cannot_assist},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat-completions client for vision prompts.
///
/// The timeout is applied to the whole request, connect to last body byte.
/// Calls are never retried.
pub struct OpenAiVisionClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiVisionClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
    detail: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<serde_json::Value>,
}

impl ApiError {
    fn code_text(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }

    fn into_error(self, status: Option<u16>) -> AnalysisError {
        let code = self.code_text();
        error!(
            status = ?status,
            error_type = ?self.kind,
            code = ?code,
            message = %self.message,
            "Upstream API returned an error"
        );

        if mentions_cannot_assist(&self.message) {
            return AnalysisError::ModerationRefusal;
        }

        AnalysisError::UpstreamCallFailure {
            status,
            kind: self.kind,
            code,
            message: self.message,
        }
    }
}

fn transport_error(err: reqwest::Error) -> AnalysisError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_decode() || err.is_body() {
        "body"
    } else {
        "request"
    };
    let status = err.status().map(|s| s.as_u16());
    error!(status = ?status, error_type = kind, error = %err, "Upstream API call failed");

    AnalysisError::UpstreamCallFailure {
        status,
        kind: Some(kind.to_string()),
        code: None,
        message: err.to_string(),
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn complete(&self, request: &VisionRequest) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::CredentialMissing)?;

        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: &request.prompt,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: &request.image_data_url,
                            detail: &request.image_detail,
                        },
                    },
                ],
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        info!(model = %request.model, "Calling upstream vision model");
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        let latency_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => envelope.error.into_error(Some(status.as_u16())),
                Err(_) => {
                    error!(status = status.as_u16(), body = %snippet(&text, 200), "Upstream API returned an error");
                    AnalysisError::UpstreamCallFailure {
                        status: Some(status.as_u16()),
                        kind: None,
                        code: None,
                        message: format!("upstream returned HTTP {}", status),
                    }
                }
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %snippet(&text, 200), "Malformed upstream response");
            AnalysisError::upstream(format!("malformed upstream response: {}", e))
        })?;

        if let Some(api_error) = parsed.error {
            return Err(api_error.into_error(Some(status.as_u16())));
        }

        let Some(message) = parsed.choices.into_iter().next().map(|c| c.message) else {
            warn!("Upstream response contained no choices");
            return Ok(String::new());
        };

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            warn!(refusal = %snippet(&refusal, 200), "Upstream model refused the request");
            return Err(AnalysisError::ModerationRefusal);
        }

        let content = message.content.unwrap_or_default();
        debug!(latency_ms, response_chars = content.len(), "Upstream call succeeded");
        Ok(content)
    }
}
