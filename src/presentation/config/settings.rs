use std::path::Path;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub openai: OpenAiSettings,
    pub extraction: ExtractionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// The default provider, used whenever a request does not bring its own.
#[derive(Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// Limits applied to request-supplied OpenAI-compatible endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// Extracted text beyond this many characters is cut from the prompt.
    pub max_prompt_chars: usize,
    pub pdf_timeout_secs: u64,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

impl Settings {
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), environment)
    }

    /// Defaults, then `appsettings.<env>.*` in `dir` (optional), then
    /// `APP__SECTION__KEY` variables. `GEMINI_API_KEY` and `GEMINI_MODEL`
    /// are accepted as defaults for the Gemini section.
    pub fn load_from(dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("gemini.api_key", "")?
            .set_default("gemini.base_url", DEFAULT_GEMINI_BASE_URL)?
            .set_default("gemini.model", DEFAULT_GEMINI_MODEL)?
            .set_default("gemini.image_model", DEFAULT_IMAGE_MODEL)?
            .set_default("openai.max_tokens", 8000)?
            .set_default("openai.temperature", 0.3)?
            .set_default("extraction.max_prompt_chars", 20_000)?
            .set_default("extraction.pdf_timeout_secs", 30)?
            .set_default("extraction.max_upload_mb", 20)?
            .set_default("logging.json", false)?;

        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            builder = builder.set_default("gemini.api_key", api_key)?;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            builder = builder.set_default("gemini.model", model)?;
        }

        let file = dir.join(format!("appsettings.{}", environment.as_str()));
        builder
            .add_source(File::with_name(&file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.extraction.max_upload_mb * 1024 * 1024
    }
}
