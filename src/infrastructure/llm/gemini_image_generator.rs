use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;

use crate::application::ports::{GeneratedImage, ImageGenerator, ImageGeneratorError};

use super::gemini_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

pub struct GeminiImageGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiImageGenerator {
    pub fn new(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    #[tracing::instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGeneratorError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["TEXT", "IMAGE"]),
                ..GenerationConfig::default()
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGeneratorError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGeneratorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ImageGeneratorError::ApiRequestFailed(e.to_string()))?;

        let image = reply
            .first_image()
            .ok_or(ImageGeneratorError::NoImageReturned)?;
        let decoded = STANDARD
            .decode(image.data.as_bytes())
            .map_err(|e| ImageGeneratorError::InvalidImageData(e.to_string()))?;
        tracing::debug!(mime_type = %image.mime_type, bytes = decoded.len(), "Image generated");

        Ok(GeneratedImage {
            mime_type: image.mime_type.clone(),
            data_base64: image.data.clone(),
        })
    }
}
