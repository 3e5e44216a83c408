pub mod image_validation;
pub mod redact;

pub use image_validation::{ImageValidator, sniff_mime};
pub use redact::redact_secret;
