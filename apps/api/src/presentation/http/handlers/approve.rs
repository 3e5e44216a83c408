use crate::{
    application::approve_assessment::dto::{ApproveAssessmentRequest, ApproveAssessmentResponse},
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

pub async fn approve(
    State(state): State<AppState>,
    payload: Result<Json<ApproveAssessmentRequest>, JsonRejection>,
) -> Result<Json<ApproveAssessmentResponse>, AppError> {
    let Json(request) = payload?;
    let approval = state.approvals.execute(request)?;
    Ok(Json(approval.into()))
}
