use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use paperforge::application::ports::{
    CompletionRequest, FragmentStream, GeneratedImage, GenerationMode, ImageGenerator,
    ImageGeneratorError, LlmClient, LlmClientError, LlmClientFactory,
};
use paperforge::domain::ProviderSelection;

/// Replays canned fragments and records every call.
pub struct StubLlmClient {
    mode: GenerationMode,
    fragments: Vec<String>,
    rate_limited: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubLlmClient {
    pub fn streaming(fragments: &[&str]) -> Self {
        Self::with_mode(GenerationMode::SchemaConstrained, fragments)
    }

    pub fn chat(reply: &str) -> Self {
        Self::with_mode(GenerationMode::ChatCompletion, &[reply])
    }

    pub fn rate_limited() -> Self {
        Self {
            rate_limited: true,
            ..Self::with_mode(GenerationMode::SchemaConstrained, &[])
        }
    }

    fn with_mode(mode: GenerationMode, fragments: &[&str]) -> Self {
        Self {
            mode,
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            rate_limited: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn record(&self, request: &CompletionRequest) -> Result<(), LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.rate_limited {
            return Err(LlmClientError::RateLimited);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl LlmClient for StubLlmClient {
    fn mode(&self) -> GenerationMode {
        self.mode
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        self.record(request)?;
        Ok(self.fragments.concat())
    }

    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, LlmClientError> {
        self.record(request)?;
        let fragments: Vec<Result<String, LlmClientError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}

/// Hands out one shared stub client and remembers each selection.
pub struct StubClientFactory {
    client: Arc<StubLlmClient>,
    selections: Mutex<Vec<ProviderSelection>>,
}

impl StubClientFactory {
    pub fn new(client: StubLlmClient) -> Self {
        Self {
            client: Arc::new(client),
            selections: Mutex::new(Vec::new()),
        }
    }

    pub fn client(&self) -> &StubLlmClient {
        &self.client
    }

    pub fn selections(&self) -> Vec<ProviderSelection> {
        self.selections.lock().unwrap().clone()
    }
}

impl LlmClientFactory for StubClientFactory {
    fn create(&self, selection: &ProviderSelection) -> Arc<dyn LlmClient> {
        self.selections.lock().unwrap().push(selection.clone());
        Arc::clone(&self.client) as Arc<dyn LlmClient>
    }
}

/// Returns a fixed PNG payload, failing for prompts that contain `fail_marker`.
pub struct StubImageGenerator {
    fail_marker: Option<String>,
    calls: AtomicUsize,
}

impl StubImageGenerator {
    pub fn new() -> Self {
        Self {
            fail_marker: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ImageGenerator for StubImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_marker {
            if prompt.contains(marker.as_str()) {
                return Err(ImageGeneratorError::NoImageReturned);
            }
        }
        Ok(GeneratedImage {
            mime_type: "image/png".to_string(),
            data_base64: "aW1n".to_string(),
        })
    }
}
