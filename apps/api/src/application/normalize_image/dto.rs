use bytes::Bytes;

/// An image as it arrived on the wire, before any validation.
#[derive(Debug, Clone)]
pub enum RawImageInput {
    /// Multipart file field.
    Upload {
        data: Bytes,
        content_type: Option<String>,
        file_name: Option<String>,
    },
    /// Base64 string, either a full data-URL or bare base64.
    Base64(String),
}

impl RawImageInput {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "multipart",
            Self::Base64(_) => "base64",
        }
    }
}
