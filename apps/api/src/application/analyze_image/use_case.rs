use crate::{
    config::AnalysisPipelineConfig,
    domain::{
        assessment::{entity::AssessmentResult, errors::AnalysisError},
        image::value_objects::ImagePayload,
    },
    infrastructure::{
        parsing::{
            json_recovery::{SNIPPET_CHARS, recover_json_object, snippet},
            refusal::is_refusal,
            remap::remap_assessment,
        },
        vision::{
            prompts::build_prompt,
            traits::{VisionModel, VisionRequest},
        },
    },
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Sends a normalized image to the vision model and turns whatever text comes
/// back into a canonical [`AssessmentResult`].
///
/// # Pipeline
/// 1. Call the upstream model once (no retry; the client enforces the timeout)
/// 2. Short-circuit on refusal language before any JSON parsing
/// 3. Recover a JSON object via the ordered extraction strategies
/// 4. Remap alternate field names onto the canonical shape
///
/// Either a fully remapped result is returned or a typed error. Never a
/// partial result.
pub struct AnalyzeImageUseCase {
    model: Arc<dyn VisionModel>,
    pipeline: AnalysisPipelineConfig,
    prompt: String,
}

impl AnalyzeImageUseCase {
    pub fn new(model: Arc<dyn VisionModel>, pipeline: AnalysisPipelineConfig) -> Self {
        let prompt = build_prompt(pipeline.prompt_variant, pipeline.response_schema);
        info!(
            model = %pipeline.model_name,
            prompt_variant = %pipeline.prompt_variant,
            response_schema = %pipeline.response_schema,
            "Initializing AnalyzeImageUseCase"
        );
        Self {
            model,
            pipeline,
            prompt,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.pipeline.model_name
    }

    #[instrument(skip(self, image), fields(mime = %image.mime(), size = image.len()))]
    pub async fn execute(&self, image: &ImagePayload) -> Result<AssessmentResult, AnalysisError> {
        let request = VisionRequest {
            model: self.pipeline.model_name.clone(),
            prompt: self.prompt.clone(),
            image_data_url: image.to_data_url(),
            image_detail: self.pipeline.image_detail.clone(),
            temperature: self.pipeline.temperature,
            max_tokens: self.pipeline.max_tokens,
        };

        let text = self.model.complete(&request).await?;
        let result = interpret_response(&text)?;

        info!(
            severity = ?result.severity_level(),
            confidence = %result.confidence,
            alternatives = result.alternative_diagnoses.len(),
            "Image analysis complete"
        );
        Ok(result)
    }
}

/// Refusal check, JSON recovery and remapping over the model's raw text.
pub fn interpret_response(text: &str) -> Result<AssessmentResult, AnalysisError> {
    if is_refusal(text) {
        warn!(response = %snippet(text, SNIPPET_CHARS), "Model declined to analyze the image");
        return Err(AnalysisError::ModerationRefusal);
    }

    let recovered = recover_json_object(text).map_err(|e| {
        if let AnalysisError::ResponseParseFailure { reason, snippet } = &e {
            error!(reason = %reason, response = %snippet, "Failed to parse AI response as JSON");
        }
        e
    })?;
    debug!(strategy = %recovered.strategy, "Recovered JSON from model response");

    Ok(remap_assessment(&recovered.value))
}
