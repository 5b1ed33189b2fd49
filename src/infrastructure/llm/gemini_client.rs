use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;

use crate::application::ports::{
    CompletionRequest, FragmentStream, GenerationMode, LlmClient, LlmClientError,
};
use crate::infrastructure::observability::sanitize_prompt;

use super::gemini_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use super::http_status::ensure_success;
use super::sse::sse_payloads;

const JSON_MIME_TYPE: &str = "application/json";

/// Gemini `generateContent` client. Schema-constrained: when a response
/// schema is given the provider itself guarantees JSON of that shape.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    fn build_body<'a>(&self, request: &'a CompletionRequest) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content::user(&request.prompt)],
            system_instruction: request.system.as_deref().map(Content::system),
            generation_config: GenerationConfig {
                response_mime_type: request.response_schema.as_ref().map(|_| JSON_MIME_TYPE),
                response_schema: request.response_schema.as_ref(),
                temperature: request.temperature,
                response_modalities: None,
            },
        }
    }

    async fn post(
        &self,
        url: String,
        body: &GenerateContentRequest<'_>,
    ) -> Result<reqwest::Response, LlmClientError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        ensure_success(response).await
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn mode(&self) -> GenerationMode {
        GenerationMode::SchemaConstrained
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Gemini generateContent");
        let body = self.build_body(request);
        let response = self.post(self.endpoint("generateContent"), &body).await?;

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        if reply.candidates.is_empty() {
            return Err(LlmClientError::InvalidResponse(
                "empty candidates".to_string(),
            ));
        }

        let text = reply.text();
        if text.is_empty() {
            return Err(LlmClientError::InvalidResponse(format!(
                "no text in reply (finish reason: {})",
                reply.finish_reason().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.model))]
    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, LlmClientError> {
        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Gemini streamGenerateContent");
        let body = self.build_body(request);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(url, &body).await?;

        let fragments = sse_payloads(response.bytes_stream()).filter_map(|payload| async move {
            match payload {
                Ok(data) => match serde_json::from_str::<GenerateContentResponse>(&data) {
                    Ok(chunk) => {
                        let text = chunk.text();
                        (!text.is_empty()).then_some(Ok(text))
                    }
                    Err(e) => Some(Err(LlmClientError::InvalidResponse(format!(
                        "malformed stream chunk: {e}"
                    )))),
                },
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(fragments))
    }
}
