mod file_loader;
mod image_generator;
mod llm_client;
mod llm_client_factory;

pub use file_loader::{FileLoader, FileLoaderError};
pub use image_generator::{GeneratedImage, ImageGenerator, ImageGeneratorError};
pub use llm_client::{CompletionRequest, FragmentStream, GenerationMode, LlmClient, LlmClientError};
pub use llm_client_factory::LlmClientFactory;
