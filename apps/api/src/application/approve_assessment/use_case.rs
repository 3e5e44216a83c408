use super::dto::ApproveAssessmentRequest;
use crate::domain::approval::entity::Approval;
use tracing::info;
use validator::Validate;

/// Records a reviewer's acknowledgment of an assessment. Nothing is persisted;
/// the approval is echoed back with a generated id.
#[derive(Debug, Default, Clone)]
pub struct ApproveAssessmentUseCase;

impl ApproveAssessmentUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        request: ApproveAssessmentRequest,
    ) -> Result<Approval, validator::ValidationErrors> {
        request.validate()?;

        let approval = Approval::new(request.diagnosis, request.notes, request.timestamp);
        info!(approval_id = %approval.id, "Diagnosis approved");
        Ok(approval)
    }
}
