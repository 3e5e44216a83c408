use crate::{
    application::{
        analyze_image::dto::AnalyzeImageResponse, normalize_image::dto::RawImageInput,
    },
    domain::assessment::entity::AssessmentResult,
    presentation::http::{
        errors::AppError,
        extractors::image_input::{ImageBase64, ImageInput, ImageUpload},
        state::AppState,
    },
};
use axum::{Json, extract::State};

async fn run_pipeline(state: &AppState, input: RawImageInput) -> Result<AssessmentResult, AppError> {
    let image = state.normalizer.execute(input).await?;
    Ok(state.analyzer.execute(&image).await?)
}

/// `POST /api/analyze`: multipart or JSON input, enveloped result.
pub async fn analyze(
    State(state): State<AppState>,
    ImageInput(input): ImageInput,
) -> Result<Json<AnalyzeImageResponse>, AppError> {
    let analysis = run_pipeline(&state, input).await?;
    Ok(Json(analysis.into()))
}

/// `POST /api/analyze/upload`: multipart only, bare result.
pub async fn analyze_upload(
    State(state): State<AppState>,
    ImageUpload(input): ImageUpload,
) -> Result<Json<AssessmentResult>, AppError> {
    Ok(Json(run_pipeline(&state, input).await?))
}

/// `POST /api/analyze/base64`: JSON only, bare result.
pub async fn analyze_base64(
    State(state): State<AppState>,
    ImageBase64(input): ImageBase64,
) -> Result<Json<AssessmentResult>, AppError> {
    Ok(Json(run_pipeline(&state, input).await?))
}
