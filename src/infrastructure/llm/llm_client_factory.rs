use std::sync::Arc;

use reqwest::Client;

use crate::application::ports::{LlmClient, LlmClientFactory};
use crate::domain::ProviderSelection;
use crate::presentation::config::{GeminiSettings, OpenAiSettings};

use super::gemini_client::GeminiClient;
use super::gemini_image_generator::GeminiImageGenerator;
use super::openai_compatible_client::OpenAiCompatibleClient;

/// Serves the configured Gemini model by default and builds an
/// OpenAI-compatible client when a request brings its own endpoint.
pub struct DefaultLlmClientFactory {
    client: Client,
    default_client: Arc<dyn LlmClient>,
    openai: OpenAiSettings,
}

impl DefaultLlmClientFactory {
    pub fn new(client: Client, gemini: &GeminiSettings, openai: OpenAiSettings) -> Self {
        if gemini.api_key.is_empty() {
            tracing::warn!("No Gemini API key configured; default provider calls will fail");
        }
        let default_client: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
            client.clone(),
            &gemini.base_url,
            gemini.api_key.clone(),
            gemini.model.clone(),
        ));

        Self {
            client,
            default_client,
            openai,
        }
    }
}

impl LlmClientFactory for DefaultLlmClientFactory {
    fn create(&self, selection: &ProviderSelection) -> Arc<dyn LlmClient> {
        match selection {
            ProviderSelection::Default => Arc::clone(&self.default_client),
            ProviderSelection::OpenAiCompatible(endpoint) => {
                tracing::debug!(
                    base_url = %endpoint.base_url,
                    model = %endpoint.model,
                    "Using request-supplied OpenAI-compatible provider"
                );
                Arc::new(
                    OpenAiCompatibleClient::new(self.client.clone(), endpoint.clone())
                        .with_limits(self.openai.max_tokens, self.openai.temperature),
                )
            }
        }
    }
}

pub fn create_image_generator(client: Client, gemini: &GeminiSettings) -> GeminiImageGenerator {
    GeminiImageGenerator::new(
        client,
        &gemini.base_url,
        gemini.api_key.clone(),
        gemini.image_model.clone(),
    )
}
