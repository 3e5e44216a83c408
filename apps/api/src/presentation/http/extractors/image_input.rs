//! Request extractors that pull an image out of a multipart form or a JSON
//! body, without validating it. Validation happens in the normalizer.

use crate::{
    application::normalize_image::dto::RawImageInput,
    domain::assessment::errors::AnalysisError,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::Field},
    http::{HeaderMap, header},
};
use bytes::BytesMut;
use serde::Deserialize;

const NO_IMAGE: &str = "No image provided";

/// JSON body accepted by the base64 routes. `image` wins over `imageData`.
#[derive(Debug, Default, Deserialize)]
pub struct ImageJsonBody {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "imageData")]
    pub image_data: Option<String>,
}

impl ImageJsonBody {
    pub fn into_input(self) -> Result<RawImageInput, AnalysisError> {
        [self.image, self.image_data]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .map(RawImageInput::Base64)
            .ok_or_else(|| AnalysisError::MissingInput(NO_IMAGE.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Multipart,
    Json,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if essence == "multipart/form-data" {
        BodyKind::Multipart
    } else if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else {
        BodyKind::Other
    }
}

/// Reads the first image out of a multipart form.
///
/// A file part named `image` wins. Text parts named `image` or `imageData` are
/// taken as base64. File parts are read chunk by chunk and rejected as soon as
/// they pass `max_bytes`.
pub async fn read_multipart(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<RawImageInput, AppError> {
    let mut base64 = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let is_file = field.file_name().is_some() || field.content_type().is_some();

        match (name.as_str(), is_file) {
            ("image", true) => return read_file_field(field, max_bytes).await,
            ("image" | "imageData", false) => {
                let text = field.text().await?;
                if base64.is_none() && !text.trim().is_empty() {
                    base64 = Some(text);
                }
            }
            _ => tracing::debug!(field = %name, "Ignoring multipart field"),
        }
    }

    base64
        .map(RawImageInput::Base64)
        .ok_or_else(|| AnalysisError::MissingInput(NO_IMAGE.into()).into())
}

async fn read_file_field(mut field: Field<'_>, max_bytes: usize) -> Result<RawImageInput, AppError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);

    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(AnalysisError::PayloadTooLarge {
                limit: max_bytes,
                actual: buffer.len() + chunk.len(),
            }
            .into());
        }
        buffer.extend_from_slice(&chunk);
    }

    tracing::debug!(
        file_name = ?file_name,
        content_type = ?content_type,
        size = buffer.len(),
        "Received image upload"
    );

    Ok(RawImageInput::Upload {
        data: buffer.freeze(),
        content_type,
        file_name,
    })
}

async fn read_json(req: Request, state: &AppState) -> Result<RawImageInput, AppError> {
    let Json(body) = Json::<ImageJsonBody>::from_request(req, state).await?;
    Ok(body.into_input()?)
}

/// Image from either a multipart form or a JSON body.
pub struct ImageInput(pub RawImageInput);

impl FromRequest<AppState> for ImageInput {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let input = match body_kind(req.headers()) {
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state).await?;
                read_multipart(multipart, state.normalizer.max_bytes()).await?
            }
            BodyKind::Json => read_json(req, state).await?,
            BodyKind::Other => return Err(AnalysisError::MissingInput(NO_IMAGE.into()).into()),
        };
        Ok(Self(input))
    }
}

/// Image from a multipart form only.
pub struct ImageUpload(pub RawImageInput);

impl FromRequest<AppState> for ImageUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if body_kind(req.headers()) != BodyKind::Multipart {
            return Err(AnalysisError::MissingInput("No image file provided".into()).into());
        }
        let multipart = Multipart::from_request(req, state).await?;
        let input = read_multipart(multipart, state.normalizer.max_bytes()).await?;
        Ok(Self(input))
    }
}

/// Base64 image from a JSON body only.
pub struct ImageBase64(pub RawImageInput);

impl FromRequest<AppState> for ImageBase64 {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if body_kind(req.headers()) != BodyKind::Json {
            return Err(AnalysisError::MissingInput("No image data provided".into()).into());
        }
        Ok(Self(read_json(req, state).await?))
    }
}
