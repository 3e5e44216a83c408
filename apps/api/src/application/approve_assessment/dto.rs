use crate::domain::approval::entity::Approval;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

pub const APPROVAL_MESSAGE: &str = "Diagnosis approved successfully";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct ApproveAssessmentRequest {
    #[serde(default)]
    #[ts(type = "unknown")]
    pub diagnosis: serde_json::Value,
    #[validate(length(max = 5000))]
    #[serde(default)]
    #[ts(optional)]
    pub notes: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApproveAssessmentResponse {
    pub success: bool,
    pub message: String,
    pub approval: Approval,
}

impl From<Approval> for ApproveAssessmentResponse {
    fn from(approval: Approval) -> Self {
        Self {
            success: true,
            message: APPROVAL_MESSAGE.to_string(),
            approval,
        }
    }
}
