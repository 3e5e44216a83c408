//! Remapping of recovered model JSON onto the canonical [`AssessmentResult`].
//!
//! Prompt variants ask for different field names (`primaryObservation` vs
//! `etiology`, `careConsiderations` vs `treatment`, ...). Every known alternate
//! name is tried first, then the canonical name, then a fixed default. Feeding
//! canonical output back through [`remap_assessment`] returns it unchanged.

use crate::domain::assessment::entity::{AlternativeDiagnosis, AssessmentResult, Treatment};
use serde_json::{Map, Value};

pub const DEFAULT_LOCATION: &str = "Not specified";
pub const DEFAULT_ETIOLOGY: &str = "Unable to determine";
pub const DEFAULT_SEVERITY: &str = "unknown";
pub const DEFAULT_CONFIDENCE: &str = "low";
pub const DEFAULT_ALTERNATIVE: &str = "Unspecified";
pub const DEFAULT_WOUND_CARE: &str = "Keep the area clean and dry";
pub const DEFAULT_DRESSING: &str = "Keep area covered as needed";
pub const DEFAULT_MEDICATIONS: &str = "Consult healthcare provider for recommendations";
pub const DEFAULT_MONITORING: &str = "Monitor for signs of infection";
pub const DEFAULT_REFERRAL: &str = "Seek professional care if the wound worsens";

/// A canonical field and the alternate names that map onto it.
struct FieldMap {
    canonical: &'static str,
    alternates: &'static [&'static str],
}

const LOCATION: FieldMap = FieldMap { canonical: "location", alternates: &["anatomicalLocation"] };
const ETIOLOGY: FieldMap = FieldMap { canonical: "etiology", alternates: &["primaryObservation"] };
const SEVERITY: FieldMap = FieldMap { canonical: "severity", alternates: &["severityLevel"] };
const CONFIDENCE: FieldMap = FieldMap { canonical: "confidence", alternates: &["confidenceLevel"] };
const ALTERNATIVES: FieldMap = FieldMap {
    canonical: "alternativeDiagnoses",
    alternates: &["alternativeExplanations"],
};
const TREATMENT: FieldMap = FieldMap { canonical: "treatment", alternates: &["careConsiderations"] };

const WOUND_CARE: FieldMap = FieldMap { canonical: "wound_care", alternates: &["self_care"] };
const DRESSING: FieldMap = FieldMap { canonical: "dressing", alternates: &["covering"] };
const MEDICATIONS: FieldMap = FieldMap { canonical: "medications", alternates: &["medication_notes"] };
const MONITORING: FieldMap = FieldMap { canonical: "monitoring", alternates: &["watch_for"] };
const REFERRAL: FieldMap = FieldMap { canonical: "referral", alternates: &["when_to_seek_care"] };

const ALT_ETIOLOGY: FieldMap = FieldMap {
    canonical: "etiology",
    alternates: &["observation", "explanation"],
};
const ALT_LIKELIHOOD: FieldMap = FieldMap { canonical: "likelihood", alternates: &["probability"] };
const ALT_REASONING: FieldMap = FieldMap { canonical: "reasoning", alternates: &["rationale"] };

impl FieldMap {
    fn names(&self) -> impl Iterator<Item = &'static str> {
        self.alternates.iter().copied().chain(std::iter::once(self.canonical))
    }

    /// First present, non-null value under any of this field's names.
    fn value<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        self.names()
            .filter_map(|name| obj.get(name))
            .find(|value| !value.is_null())
    }

    fn text(&self, obj: &Map<String, Value>) -> Option<String> {
        self.names().filter_map(|name| obj.get(name)).find_map(as_text)
    }

    fn text_or(&self, obj: &Map<String, Value>, default: &str) -> String {
        self.text(obj).unwrap_or_else(|| default.to_string())
    }
}

/// Renders a scalar (or a list of scalars) as display text. Blank strings count as absent.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(as_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

pub fn remap_assessment(raw: &Map<String, Value>) -> AssessmentResult {
    AssessmentResult {
        location: LOCATION.text_or(raw, DEFAULT_LOCATION),
        etiology: ETIOLOGY.text_or(raw, DEFAULT_ETIOLOGY),
        severity: SEVERITY.text_or(raw, DEFAULT_SEVERITY),
        confidence: CONFIDENCE.text_or(raw, DEFAULT_CONFIDENCE),
        alternative_diagnoses: remap_alternatives(ALTERNATIVES.value(raw)),
        treatment: remap_treatment(TREATMENT.value(raw)),
    }
}

fn remap_alternatives(value: Option<&Value>) -> Vec<AlternativeDiagnosis> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(obj) => Some(AlternativeDiagnosis {
                etiology: ALT_ETIOLOGY.text_or(obj, DEFAULT_ALTERNATIVE),
                likelihood: ALT_LIKELIHOOD.text(obj),
                reasoning: ALT_REASONING.text(obj),
            }),
            other => as_text(other).map(|etiology| AlternativeDiagnosis {
                etiology,
                likelihood: None,
                reasoning: None,
            }),
        })
        .collect()
}

fn remap_treatment(value: Option<&Value>) -> Treatment {
    let empty = Map::new();
    let (obj, free_text) = match value {
        Some(Value::Object(obj)) => (obj, None),
        Some(other) => (&empty, as_text(other)),
        None => (&empty, None),
    };

    Treatment {
        wound_care: WOUND_CARE
            .text(obj)
            .or(free_text)
            .unwrap_or_else(|| DEFAULT_WOUND_CARE.to_string()),
        dressing: DRESSING.text_or(obj, DEFAULT_DRESSING),
        medications: MEDICATIONS.text_or(obj, DEFAULT_MEDICATIONS),
        monitoring: MONITORING.text_or(obj, DEFAULT_MONITORING),
        referral: REFERRAL.text_or(obj, DEFAULT_REFERRAL),
    }
}
