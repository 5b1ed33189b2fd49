use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    CompletionRequest, FragmentStream, GenerationMode, LlmClient, LlmClientError,
};
use crate::domain::OpenAiEndpoint;
use crate::infrastructure::observability::sanitize_prompt;

use super::http_status::ensure_success;
use super::sse::sse_payloads;

pub const DEFAULT_MAX_TOKENS: usize = 8000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Any `/chat/completions` endpoint speaking the OpenAI wire format.
///
/// Only JSON mode is available here, so a requested schema is passed to the
/// model as an instruction and the shape is checked after decoding.
pub struct OpenAiCompatibleClient {
    client: Client,
    endpoint: OpenAiEndpoint,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(client: Client, endpoint: OpenAiEndpoint) -> Self {
        Self {
            client,
            endpoint,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_limits(mut self, max_tokens: usize, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn build_messages(&self, request: &CompletionRequest) -> Vec<ChatMessage> {
        let mut system = request.system.clone().unwrap_or_default();
        if let Some(schema) = &request.response_schema {
            if !system.is_empty() {
                system.push_str("\n\n");
            }
            system.push_str("Respond with a single JSON object that follows this schema:\n");
            system.push_str(&schema.to_string());
        }

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });
        messages
    }

    fn build_body<'a>(
        &'a self,
        request: &CompletionRequest,
        stream: bool,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.endpoint.model,
            messages: self.build_messages(request),
            max_tokens: self.max_tokens,
            temperature: request.temperature.unwrap_or(self.temperature),
            response_format: request.response_schema.as_ref().map(|_| ResponseFormat {
                r#type: "json_object",
            }),
            stream: stream.then_some(true),
        }
    }

    async fn post(
        &self,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<reqwest::Response, LlmClientError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint.base_url))
            .header("Authorization", format!("Bearer {}", self.endpoint.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        ensure_success(response).await
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    fn mode(&self) -> GenerationMode {
        GenerationMode::ChatCompletion
    }

    fn model(&self) -> &str {
        &self.endpoint.model
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.endpoint.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Chat completion");
        let body = self.build_body(request, false);
        let response = self.post(&body).await?;

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.endpoint.model))]
    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, LlmClientError> {
        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Streaming chat completion");
        let body = self.build_body(request, true);
        let response = self.post(&body).await?;

        let tokens = sse_payloads(response.bytes_stream()).filter_map(|payload| async move {
            match payload {
                Ok(data) => serde_json::from_str::<ChatCompletionChunk>(&data)
                    .ok()
                    .and_then(|chunk| chunk.choices.into_iter().next())
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(tokens))
    }
}
