use super::dto::RawImageInput;
use crate::{
    domain::{
        assessment::errors::AnalysisError,
        image::{data_url::DataUrl, value_objects::ImagePayload},
    },
    infrastructure::{security::ImageValidator, upload::staging::UploadStaging},
};
use bytes::Bytes;
use tracing::{debug, instrument};

/// Turns either input form into a validated [`ImagePayload`].
///
/// Both paths run the same allow-list: declared type, extension (uploads
/// only), size cap and content sniffing.
pub struct NormalizeImageUseCase {
    validator: ImageValidator,
    staging: UploadStaging,
}

impl NormalizeImageUseCase {
    pub fn new(validator: ImageValidator, staging: UploadStaging) -> Self {
        Self { validator, staging }
    }

    pub fn max_bytes(&self) -> usize {
        self.validator.max_bytes()
    }

    #[instrument(skip(self, input), fields(source = input.source()))]
    pub async fn execute(&self, input: RawImageInput) -> Result<ImagePayload, AnalysisError> {
        let payload = match input {
            RawImageInput::Upload {
                data,
                content_type,
                file_name,
            } => {
                self.normalize_upload(data, content_type.as_deref(), file_name.as_deref())
                    .await?
            }
            RawImageInput::Base64(value) => self.normalize_base64(&value)?,
        };

        debug!(mime = %payload.mime(), size = payload.len(), "Image normalized");
        Ok(payload)
    }

    async fn normalize_upload(
        &self,
        data: Bytes,
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<ImagePayload, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::MissingInput("No image provided".into()));
        }
        self.validator.check_size(data.len())?;
        let by_name = self.validator.check_file_name(file_name)?;
        let declared = self.validator.check_declared(content_type)?;

        let extension = declared
            .or(by_name)
            .map(|mime| mime.extension())
            .unwrap_or("bin");
        let staged = self.staging.stage(data, extension).await?;

        self.validator.validate(staged, content_type, file_name)
    }

    fn normalize_base64(&self, value: &str) -> Result<ImagePayload, AnalysisError> {
        let url = DataUrl::parse(value)?;
        self.validator.check_declared(url.mime)?;

        // Reject before allocating the decoded buffer.
        let decoded_len = url.decoded_len();
        if decoded_len > self.validator.max_bytes() {
            return Err(AnalysisError::PayloadTooLarge {
                limit: self.validator.max_bytes(),
                actual: decoded_len,
            });
        }

        let decoded = url.decode()?;
        self.validator.validate(Bytes::from(decoded), url.mime, None)
    }
}
