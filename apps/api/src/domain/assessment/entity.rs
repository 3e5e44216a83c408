use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Canonical wound assessment returned to every caller, whatever schema the
/// model was asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentResult {
    pub location: String,
    pub etiology: String,
    pub severity: String,
    pub confidence: String,
    pub alternative_diagnoses: Vec<AlternativeDiagnosis>,
    pub treatment: Treatment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AlternativeDiagnosis {
    pub etiology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub likelihood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Treatment {
    pub wound_care: String,
    pub dressing: String,
    pub medications: String,
    pub monitoring: String,
    pub referral: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Unknown,
}

impl Severity {
    /// Lenient parse of the model's free-text severity ("Mild", "moderate-severe", ...).
    /// The most severe keyword present wins.
    pub fn parse(value: &str) -> Self {
        let lower = value.to_ascii_lowercase();
        if lower.contains("severe") {
            Self::Severe
        } else if lower.contains("moderate") {
            Self::Moderate
        } else if lower.contains("mild") {
            Self::Mild
        } else {
            Self::Unknown
        }
    }
}

impl AssessmentResult {
    pub fn severity_level(&self) -> Severity {
        Severity::parse(&self.severity)
    }
}
