//! Instruction prompts sent with every image.
//!
//! A prompt is a wording preamble ([`PromptVariant`]) followed by the JSON
//! template the model must fill ([`ResponseSchema`]).

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVariant {
    #[default]
    Clinical,
    Educational,
    Observational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseSchema {
    #[default]
    Canonical,
    Observational,
}

impl FromStr for PromptVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clinical" => Ok(Self::Clinical),
            "educational" => Ok(Self::Educational),
            "observational" => Ok(Self::Observational),
            other => Err(format!(
                "unknown prompt variant '{}', expected clinical, educational or observational",
                other
            )),
        }
    }
}

impl FromStr for ResponseSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "observational" => Ok(Self::Observational),
            other => Err(format!(
                "unknown response schema '{}', expected canonical or observational",
                other
            )),
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clinical => "clinical",
            Self::Educational => "educational",
            Self::Observational => "observational",
        })
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Canonical => "canonical",
            Self::Observational => "observational",
        })
    }
}

const CLINICAL_PREAMBLE: &str = "You are an expert medical AI assistant specializing in wound assessment. \
Analyze this wound image and provide a detailed clinical assessment.";

const EDUCATIONAL_PREAMBLE: &str = "You are a medical imaging system supporting healthcare education and research. \
Review this clinical image for training purposes and provide a structured assessment.";

const OBSERVATIONAL_PREAMBLE: &str = "Describe what is visible in this skin image for general wellness guidance. \
Do not diagnose; describe observations and sensible care considerations only.";

const CANONICAL_TEMPLATE: &str = r#"{
  "location": "anatomical location of the wound",
  "etiology": "primary wound etiology or cause",
  "severity": "mild/moderate/severe",
  "confidence": "high/medium/low",
  "alternativeDiagnoses": [
    {"etiology": "alternative diagnosis", "likelihood": "high/medium/low", "reasoning": "clinical reasoning"}
  ],
  "treatment": {
    "wound_care": "wound care protocol",
    "dressing": "dressing type and change frequency",
    "medications": "medication guidance, if applicable",
    "monitoring": "what to monitor",
    "referral": "when to seek specialist care"
  }
}"#;

const OBSERVATIONAL_TEMPLATE: &str = r#"{
  "location": "where on the body the area is",
  "primaryObservation": "most likely explanation of what is visible",
  "severity": "mild/moderate/severe",
  "confidence": "high/medium/low",
  "alternativeExplanations": [
    {"observation": "another possible explanation", "likelihood": "high/medium/low", "reasoning": "why it fits"}
  ],
  "careConsiderations": {
    "self_care": "general self-care steps",
    "monitoring": "changes worth watching for",
    "when_to_seek_care": "signs that warrant seeing a professional"
  }
}"#;

const CLOSING: &str = "List two or three alternatives ranked by likelihood. \
Respond with ONLY the JSON object: no markdown, no code fences, no commentary.";

pub fn build_prompt(variant: PromptVariant, schema: ResponseSchema) -> String {
    let preamble = match variant {
        PromptVariant::Clinical => CLINICAL_PREAMBLE,
        PromptVariant::Educational => EDUCATIONAL_PREAMBLE,
        PromptVariant::Observational => OBSERVATIONAL_PREAMBLE,
    };
    let template = match schema {
        ResponseSchema::Canonical => CANONICAL_TEMPLATE,
        ResponseSchema::Observational => OBSERVATIONAL_TEMPLATE,
    };

    format!(
        "{}\n\nReturn a JSON object with exactly this structure:\n{}\n\n{}",
        preamble, template, CLOSING
    )
}
