use crate::{
    application::{
        analyze_image::use_case::AnalyzeImageUseCase,
        approve_assessment::use_case::ApproveAssessmentUseCase,
        normalize_image::use_case::NormalizeImageUseCase,
    },
    config::Config,
    infrastructure::{
        security::ImageValidator, upload::staging::UploadStaging, vision::traits::VisionModel,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub normalizer: Arc<NormalizeImageUseCase>,
    pub analyzer: Arc<AnalyzeImageUseCase>,
    pub approvals: ApproveAssessmentUseCase,
}

impl AppState {
    /// Wires the use cases around an injected vision model.
    pub fn new(config: Config, model: Arc<dyn VisionModel>) -> Self {
        let normalizer = NormalizeImageUseCase::new(
            ImageValidator::new(config.max_image_bytes),
            UploadStaging::new(config.upload_storage, config.upload_dir.clone()),
        );
        let analyzer = AnalyzeImageUseCase::new(model, config.pipeline.clone());

        Self {
            config,
            normalizer: Arc::new(normalizer),
            analyzer: Arc::new(analyzer),
            approvals: ApproveAssessmentUseCase::new(),
        }
    }
}
