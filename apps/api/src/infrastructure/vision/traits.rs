use crate::domain::assessment::errors::AnalysisError;
use async_trait::async_trait;

/// One prompt + one inline image, sent to a vision-capable chat model.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub model: String,
    pub prompt: String,
    pub image_data_url: String,
    pub image_detail: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send the request and return the model's raw text reply.
    ///
    /// Implementations must not retry. Transport and API failures surface as
    /// [`AnalysisError::UpstreamCallFailure`]; an upstream moderation block
    /// surfaces as [`AnalysisError::ModerationRefusal`].
    async fn complete(&self, request: &VisionRequest) -> Result<String, AnalysisError>;
}
