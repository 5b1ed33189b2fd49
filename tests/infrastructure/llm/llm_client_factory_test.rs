use paperforge::application::ports::{GenerationMode, LlmClientFactory};
use paperforge::domain::{OpenAiEndpoint, ProviderSelection};
use paperforge::infrastructure::llm::DefaultLlmClientFactory;
use paperforge::presentation::config::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_IMAGE_MODEL, GeminiSettings,
    OpenAiSettings,
};

fn factory() -> DefaultLlmClientFactory {
    let gemini = GeminiSettings {
        api_key: "key".to_string(),
        base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        model: DEFAULT_GEMINI_MODEL.to_string(),
        image_model: DEFAULT_IMAGE_MODEL.to_string(),
    };
    let openai = OpenAiSettings {
        max_tokens: 8000,
        temperature: 0.3,
    };
    DefaultLlmClientFactory::new(reqwest::Client::new(), &gemini, openai)
}

#[test]
fn given_default_selection_when_creating_then_gemini_schema_constrained_client() {
    let client = factory().create(&ProviderSelection::Default);

    assert_eq!(client.mode(), GenerationMode::SchemaConstrained);
    assert_eq!(client.model(), DEFAULT_GEMINI_MODEL);
}

#[test]
fn given_openai_selection_when_creating_then_chat_completion_client_for_model() {
    let selection = ProviderSelection::OpenAiCompatible(OpenAiEndpoint {
        base_url: "http://localhost:1234/v1".to_string(),
        api_key: "sk".to_string(),
        model: "deepseek-chat".to_string(),
    });

    let client = factory().create(&selection);

    assert_eq!(client.mode(), GenerationMode::ChatCompletion);
    assert_eq!(client.model(), "deepseek-chat");
}
