use crate::domain::{
    assessment::errors::AnalysisError,
    image::value_objects::{ImageMime, ImagePayload},
};
use bytes::Bytes;
use image::ImageFormat;
use std::path::Path;
use tracing::{instrument, warn};

/// Detects JPEG/PNG/WebP content from magic numbers.
pub fn sniff_mime(data: &[u8]) -> Option<ImageMime> {
    match image::guess_format(data).ok()? {
        ImageFormat::Jpeg => Some(ImageMime::Jpeg),
        ImageFormat::Png => Some(ImageMime::Png),
        ImageFormat::WebP => Some(ImageMime::Webp),
        _ => None,
    }
}

/// Applies the same allow-list to every image input path: declared type,
/// file name extension, size cap and sniffed content.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_bytes: usize,
}

impl ImageValidator {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check_size(&self, len: usize) -> Result<(), AnalysisError> {
        if len > self.max_bytes {
            return Err(AnalysisError::PayloadTooLarge {
                limit: self.max_bytes,
                actual: len,
            });
        }
        Ok(())
    }

    /// `None` and `application/octet-stream` mean "not declared".
    pub fn check_declared(&self, declared: Option<&str>) -> Result<Option<ImageMime>, AnalysisError> {
        let Some(declared) = declared.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(None);
        };
        if declared.eq_ignore_ascii_case("application/octet-stream") {
            return Ok(None);
        }
        ImageMime::from_mime(declared).map(Some).ok_or_else(|| {
            AnalysisError::UnsupportedMediaType(format!(
                "Only image files (JPEG, PNG, WebP) are allowed, got '{}'",
                declared
            ))
        })
    }

    pub fn check_file_name(&self, file_name: Option<&str>) -> Result<Option<ImageMime>, AnalysisError> {
        let Some(ext) = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
        else {
            return Ok(None);
        };
        ImageMime::from_extension(ext).map(Some).ok_or_else(|| {
            AnalysisError::UnsupportedMediaType(format!(
                "File extension '{}' not allowed, expected one of: {}",
                ext,
                ImageMime::ALLOWED_EXTENSIONS.join(", ")
            ))
        })
    }

    /// Full validation. The sniffed content type is canonical; a mismatch with
    /// the declared type is logged and the sniffed type wins.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub fn validate(
        &self,
        data: Bytes,
        declared: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<ImagePayload, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::MissingInput("Image payload is empty".into()));
        }
        self.check_size(data.len())?;
        self.check_file_name(file_name)?;
        let declared_mime = self.check_declared(declared)?;

        let sniffed = sniff_mime(&data).ok_or_else(|| {
            AnalysisError::UnsupportedMediaType(
                "Image content is not a recognized JPEG, PNG or WebP file".into(),
            )
        })?;

        if let Some(declared_mime) = declared_mime {
            if declared_mime != sniffed {
                warn!(declared = %declared_mime, sniffed = %sniffed, "Declared image type does not match content");
            }
        }

        ImagePayload::new(data, sniffed)
    }
}
