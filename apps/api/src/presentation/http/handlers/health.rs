use crate::{infrastructure::security::redact_secret, presentation::http::state::AppState};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub has_api_key: bool,
    /// At most the first four characters of the credential.
    pub api_key_prefix: String,
    pub model: String,
    pub version: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let api_key = state.config.openai_api_key.as_deref();

    Json(HealthResponse {
        status: "OK".into(),
        message: "Wound Analysis API is running".into(),
        has_api_key: api_key.is_some(),
        api_key_prefix: redact_secret(api_key),
        model: state.analyzer.model_name().to_string(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
