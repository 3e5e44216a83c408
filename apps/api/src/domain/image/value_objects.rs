use crate::domain::assessment::errors::AnalysisError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use std::fmt;

/// Image encodings the upstream vision model is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub const ALLOWED_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png", "webp"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Parses a declared MIME type, ignoring parameters and case.
    /// `image/jpg` is accepted as an alias of `image/jpeg`.
    pub fn from_mime(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, request-scoped image: non-empty bytes plus a recognized MIME type.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Bytes,
    mime: ImageMime,
}

impl ImagePayload {
    pub fn new(bytes: Bytes, mime: ImageMime) -> Result<Self, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::MissingInput("Image payload is empty".into()));
        }
        Ok(Self { bytes, mime })
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`, the form the vision API accepts inline.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
