mod gemini_client;
mod gemini_image_generator;
mod gemini_types;
mod http_status;
mod llm_client_factory;
mod openai_compatible_client;
mod sse;

pub use gemini_client::GeminiClient;
pub use gemini_image_generator::GeminiImageGenerator;
pub use llm_client_factory::{DefaultLlmClientFactory, create_image_generator};
pub use openai_compatible_client::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, OpenAiCompatibleClient,
};
pub use sse::{SSE_DONE, sse_data, sse_payloads};
