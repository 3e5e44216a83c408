use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Acknowledgment that a reviewer accepted an assessment. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Approval {
    pub id: String,
    #[ts(type = "unknown")]
    pub diagnosis: serde_json::Value,
    pub notes: Option<String>,
    pub timestamp: String,
    pub status: String,
}

impl Approval {
    pub const STATUS_APPROVED: &'static str = "approved";

    /// Builds an approval, falling back to the server clock when the caller
    /// did not supply a timestamp.
    pub fn new(
        diagnosis: serde_json::Value,
        notes: Option<String>,
        timestamp: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let timestamp = timestamp
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        Self {
            id: format!("approval-{}", now.timestamp_millis()),
            diagnosis,
            notes,
            timestamp,
            status: Self::STATUS_APPROVED.to_string(),
        }
    }
}
