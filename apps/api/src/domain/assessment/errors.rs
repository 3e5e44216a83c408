use thiserror::Error;

/// Message returned to the caller whenever the upstream model declines an image.
pub const MODERATION_REFUSAL_MESSAGE: &str = "The AI model declined to analyze this image. \
Please try a different, clearer image of the wound, or consult a healthcare professional directly.";

/// Failures along the normalize → call upstream → recover → remap pipeline.
///
/// The first four variants are input-validation failures the caller can fix.
/// The remaining ones describe the interaction with the upstream model.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    #[error("Image is {actual} bytes, exceeding the {limit} byte limit")]
    PayloadTooLarge { limit: usize, actual: usize },

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{}", MODERATION_REFUSAL_MESSAGE)]
    ModerationRefusal,

    #[error("Failed to parse AI response as JSON: {reason}")]
    ResponseParseFailure { reason: String, snippet: String },

    #[error("Upstream call failed (status={status:?}, type={kind:?}, code={code:?}): {message}")]
    UpstreamCallFailure {
        status: Option<u16>,
        kind: Option<String>,
        code: Option<String>,
        message: String,
    },

    #[error("Upstream API credential is not configured")]
    CredentialMissing,

    #[error("Upload staging failed: {0}")]
    StagingFailure(String),
}

impl AnalysisError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamCallFailure {
            status: None,
            kind: None,
            code: None,
            message: message.into(),
        }
    }
}
