//! HTTP error handling and response conversion.
//!
//! Every handler returns [`AppError`] on failure. It maps to a status code and a
//! `{"error": <message>}` body. The message shown to the caller never contains
//! raw model output or upstream error detail; that goes to the log.

use crate::domain::assessment::errors::{AnalysisError, MODERATION_REFUSAL_MESSAGE};
use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400).
    BadRequest(String),

    /// Request data failed validation (400).
    ValidationError(String),

    /// Image or body above the configured cap (413).
    PayloadTooLarge(String),

    /// Image type outside the JPEG/PNG/WebP allow-list (415).
    UnsupportedMediaType(String),

    /// The model declined to analyze the image (422).
    ModerationRefusal,

    /// Model reply held no recoverable JSON object (502).
    ResponseParse(String),

    /// Upstream call failed: transport, timeout, non-2xx or API error (502).
    Upstream(String),

    /// External service not usable, e.g. credential not configured (503).
    ExternalService(String),

    /// Upload staging failed (500).
    Storage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            Self::ModerationRefusal => write!(f, "Model refused to analyze the image"),
            Self::ResponseParse(msg) => write!(f, "Response parse error: {}", msg),
            Self::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            Self::ExternalService(msg) => write!(f, "External service error: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ModerationRefusal => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ResponseParse(_) | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ExternalService(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::ValidationError(msg)
            | Self::PayloadTooLarge(msg)
            | Self::UnsupportedMediaType(msg) => msg.clone(),
            Self::ModerationRefusal => MODERATION_REFUSAL_MESSAGE.into(),
            Self::ResponseParse(_) => {
                "Failed to parse AI response. Please try again with a clearer image.".into()
            }
            Self::Upstream(_) => "Failed to analyze image. Please try again later.".into(),
            Self::ExternalService(msg) => msg.clone(),
            Self::Storage(_) => "File operation failed".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// === Domain Error Conversion ===

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::MissingInput(msg) => AppError::BadRequest(msg),
            e @ AnalysisError::InvalidImageData(_) => AppError::BadRequest(e.to_string()),
            e @ AnalysisError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            AnalysisError::UnsupportedMediaType(msg) => AppError::UnsupportedMediaType(msg),
            AnalysisError::ModerationRefusal => AppError::ModerationRefusal,
            AnalysisError::ResponseParseFailure { reason, snippet } => {
                tracing::error!(reason = %reason, snippet = %snippet, "Unparseable model response");
                AppError::ResponseParse(reason)
            }
            e @ AnalysisError::UpstreamCallFailure { .. } => AppError::Upstream(e.to_string()),
            AnalysisError::CredentialMissing => {
                AppError::ExternalService("Vision model API key is not configured".into())
            }
            AnalysisError::StagingFailure(msg) => AppError::Storage(msg),
        }
    }
}

// === Request Body Rejections ===

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge("Request body is too large".into());
        }
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge("Request body is too large".into());
        }
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
