mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_IMAGE_MODEL, ExtractionSettings,
    GeminiSettings, LoggingSettings, OpenAiSettings, ServerSettings, Settings,
};
