//! Parsing of base64 image strings as sent by browser camera capture:
//! either a full `data:<mime>;base64,<payload>` URL or bare base64.

use crate::domain::assessment::errors::AnalysisError;
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// MIME type declared in the URL header, if any.
    pub mime: Option<&'a str>,
    /// Still-encoded base64 payload.
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(input: &'a str) -> Result<Self, AnalysisError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::MissingInput("No image data provided".into()));
        }

        let Some(rest) = strip_prefix_ignore_case(trimmed, "data:") else {
            return Ok(Self {
                mime: None,
                payload: trimmed,
            });
        };

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AnalysisError::InvalidImageData("data URL has no payload".into()))?;

        let mime = strip_suffix_ignore_case(header, ";base64").ok_or_else(|| {
            AnalysisError::InvalidImageData("only base64-encoded data URLs are supported".into())
        })?;
        let mime = mime.trim();

        Ok(Self {
            mime: (!mime.is_empty()).then_some(mime),
            payload,
        })
    }

    /// Decoded length computed from the encoded text alone, so oversized
    /// input can be rejected before decoding. Whitespace and padding are not
    /// counted.
    pub fn decoded_len(&self) -> usize {
        let significant = self
            .payload
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .count();
        let padding = self
            .payload
            .bytes()
            .rev()
            .filter(|b| !b.is_ascii_whitespace())
            .take_while(|&b| b == b'=')
            .count();
        (significant - padding) * 3 / 4
    }

    pub fn decode(&self) -> Result<Vec<u8>, AnalysisError> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(AnalysisError::MissingInput("No image data provided".into()));
        }

        STANDARD
            .decode(&compact)
            .or_else(|_| STANDARD_NO_PAD.decode(&compact))
            .map_err(|e| AnalysisError::InvalidImageData(format!("base64 decoding failed: {}", e)))
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    let tail = value.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &value[..split])
}
