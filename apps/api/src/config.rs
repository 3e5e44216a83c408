//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup. `main` calls `dotenvy::dotenv()`
//! first, so a local `.env` file works the same as real environment variables.
//!
//! # Environment Variables
//!
//! ## Upstream
//! - `OPENAI_API_KEY`: credential for the vision model API (required for analyze calls)
//! - `OPENAI_BASE_URL`: API base URL (default: "https://api.openai.com/v1")
//! - `MODEL_NAME`: vision-capable model (default: "gpt-4o")
//! - `PROMPT_VARIANT`: clinical | educational | observational (default: clinical)
//! - `RESPONSE_SCHEMA`: canonical | observational (default: canonical)
//! - `TEMPERATURE`: sampling temperature (default: 0.3)
//! - `MAX_TOKENS`: completion token cap (default: 2000)
//! - `IMAGE_DETAIL`: vision detail hint (default: "high")
//! - `UPSTREAM_TIMEOUT_SECS`: bounded timeout per upstream call (default: 60)
//!
//! ## Server
//! - `RUST_LOG`: logging level (default: "info,wound_api=debug,tower_http=debug")
//! - `HOST`: bind address (default: "0.0.0.0")
//! - `PORT`: bind port (default: 5000)
//! - `APP_ENV` / `NODE_ENV`: "production" enables serving the prebuilt UI bundle
//! - `STATIC_DIR`: prebuilt UI bundle directory (default: "client/build")
//! - `MAX_BODY_BYTES`: request body cap (default: 50 MiB)
//!
//! ## Uploads
//! - `MAX_IMAGE_BYTES`: decoded image size cap (default: 10 MiB)
//! - `UPLOAD_STORAGE`: memory | disk (default: memory)
//! - `UPLOAD_DIR`: disk staging directory (default: `<tmp>/wound-uploads`)

use crate::infrastructure::{
    upload::staging::UploadStorageMode,
    vision::{
        openai_client::DEFAULT_BASE_URL,
        prompts::{PromptVariant, ResponseSchema},
    },
};
use std::{path::PathBuf, time::Duration};

/// Prompt wording, requested schema and sampling settings for the single
/// analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPipelineConfig {
    pub prompt_variant: PromptVariant,
    pub response_schema: ResponseSchema,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Vision detail hint sent with the image ("high" uses the full tile budget).
    pub image_detail: String,
}

impl Default for AnalysisPipelineConfig {
    fn default() -> Self {
        Self {
            prompt_variant: PromptVariant::default(),
            response_schema: ResponseSchema::default(),
            model_name: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            image_detail: "high".to_string(),
        }
    }
}

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Upstream API credential. Analyze calls fail fast when unset.
    pub openai_api_key: Option<String>,

    pub openai_base_url: String,

    pub pipeline: AnalysisPipelineConfig,

    /// Upper bound on a single upstream call. There is no retry.
    pub upstream_timeout: Duration,

    /// Serve the prebuilt browser bundle from `static_dir`
    pub production: bool,

    pub static_dir: PathBuf,

    /// Decoded image size cap in bytes
    pub max_image_bytes: usize,

    /// Request body cap in bytes (multipart and JSON)
    pub max_body_bytes: usize,

    pub upload_storage: UploadStorageMode,

    pub upload_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let production = env
            .optional("APP_ENV")
            .or_else(|| env.optional("NODE_ENV"))
            .is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let defaults = AnalysisPipelineConfig::default();
        let pipeline = AnalysisPipelineConfig {
            prompt_variant: env.or("PROMPT_VARIANT", defaults.prompt_variant)?,
            response_schema: env.or("RESPONSE_SCHEMA", defaults.response_schema)?,
            model_name: env.or("MODEL_NAME", defaults.model_name)?,
            temperature: env.or("TEMPERATURE", defaults.temperature)?,
            max_tokens: env.or("MAX_TOKENS", defaults.max_tokens)?,
            image_detail: env.or("IMAGE_DETAIL", defaults.image_detail)?,
        };
        if !(0.0..=2.0).contains(&pipeline.temperature) {
            anyhow::bail!("TEMPERATURE must be between 0.0 and 2.0, got {}", pipeline.temperature);
        }

        let timeout_secs: u64 = env.or("UPSTREAM_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            host: env.or("HOST", "0.0.0.0".to_string())?,
            port: env.or("PORT", 5000)?,
            openai_api_key: env.optional("OPENAI_API_KEY"),
            openai_base_url: env.or("OPENAI_BASE_URL", DEFAULT_BASE_URL.to_string())?,
            pipeline,
            upstream_timeout: Duration::from_secs(timeout_secs),
            production,
            static_dir: env.or("STATIC_DIR", PathBuf::from("client/build"))?,
            max_image_bytes: env.or("MAX_IMAGE_BYTES", 10 * 1024 * 1024)?,
            max_body_bytes: env.or("MAX_BODY_BYTES", 50 * 1024 * 1024)?,
            upload_storage: env.or("UPLOAD_STORAGE", UploadStorageMode::Memory)?,
            upload_dir: env
                .optional("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("wound-uploads")),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Value of `key`, with blank values treated as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parsed value of `key`, or `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but cannot be parsed.
    fn or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(val) => val
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
            None => Ok(default),
        }
    }
}
