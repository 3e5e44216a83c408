use crate::domain::assessment::entity::AssessmentResult;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Envelope returned by `POST /api/analyze`. The `/upload` and `/base64`
/// routes return the bare [`AssessmentResult`] instead.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyzeImageResponse {
    pub success: bool,
    pub analysis: AssessmentResult,
}

impl From<AssessmentResult> for AnalyzeImageResponse {
    fn from(analysis: AssessmentResult) -> Self {
        Self {
            success: true,
            analysis,
        }
    }
}
