//! Recovery of a JSON object from free-form model output.
//!
//! Models are told to answer with bare JSON but regularly wrap it in prose or
//! markdown fences. Recovery runs a fixed, ordered list of named strategies
//! and the first one that yields a JSON **object** wins:
//!
//! 1. [`ExtractionStrategy::DirectParse`]: the whole trimmed text
//! 2. [`ExtractionStrategy::FencedJson`]: the first ```` ```json ```` block
//! 3. [`ExtractionStrategy::FencedPlain`]: the first unlabeled ```` ``` ```` block
//! 4. [`ExtractionStrategy::BraceScan`]: first `{` through last `}`
//!
//! A candidate that fails to parse, or parses to something other than an
//! object, falls through to the next strategy.

use crate::domain::assessment::errors::AnalysisError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of characters of raw model text carried in a parse failure.
pub const SNIPPET_CHARS: usize = 200;

lazy_static! {
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap();
    static ref FENCED_PLAIN: Regex = Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap();
    static ref BRACE_SCAN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    DirectParse,
    FencedJson,
    FencedPlain,
    BraceScan,
}

impl ExtractionStrategy {
    pub const ORDER: [ExtractionStrategy; 4] = [
        Self::DirectParse,
        Self::FencedJson,
        Self::FencedPlain,
        Self::BraceScan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectParse => "direct_parse",
            Self::FencedJson => "fenced_json",
            Self::FencedPlain => "fenced_plain",
            Self::BraceScan => "brace_scan",
        }
    }

    /// The slice of `text` this strategy would try to parse, if it finds one.
    pub fn candidate<'a>(&self, text: &'a str) -> Option<&'a str> {
        match self {
            Self::DirectParse => Some(text.trim()),
            Self::FencedJson => FENCED_JSON
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
            Self::FencedPlain => FENCED_PLAIN
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
            Self::BraceScan => BRACE_SCAN.find(text).map(|m| m.as_str()),
        }
    }

    /// Runs this strategy alone.
    pub fn extract(&self, text: &str) -> Result<Map<String, Value>, String> {
        let candidate = self
            .candidate(text)
            .ok_or_else(|| format!("{}: no candidate found", self.name()))?;
        parse_object(candidate).map_err(|e| format!("{}: {}", self.name(), e))
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredJson {
    pub value: Map<String, Value>,
    pub strategy: ExtractionStrategy,
}

fn parse_object(candidate: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Tries every strategy in [`ExtractionStrategy::ORDER`] and returns the
/// first JSON object found.
///
/// # Errors
///
/// [`AnalysisError::ResponseParseFailure`] when no strategy succeeds. The
/// error carries the last strategy's failure reason and a truncated snippet of
/// the raw text.
pub fn recover_json_object(text: &str) -> Result<RecoveredJson, AnalysisError> {
    let mut last_reason = None;

    for strategy in ExtractionStrategy::ORDER {
        match strategy.extract(text) {
            Ok(value) => return Ok(RecoveredJson { value, strategy }),
            Err(reason) => {
                tracing::trace!(strategy = %strategy, reason = %reason, "JSON extraction strategy failed");
                last_reason = Some(reason);
            }
        }
    }

    Err(AnalysisError::ResponseParseFailure {
        reason: last_reason.unwrap_or_else(|| "no JSON object found in response".into()),
        snippet: snippet(text, SNIPPET_CHARS),
    })
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
