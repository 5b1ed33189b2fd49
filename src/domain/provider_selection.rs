use serde::Deserialize;

/// Provider override fields as they arrive on a request, either as multipart
/// form fields or as top-level JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFields {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openai_model: Option<String>,
}

/// Which model backend serves a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSelection {
    /// The process-wide default provider injected at startup.
    Default,
    OpenAiCompatible(OpenAiEndpoint),
}

#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for OpenAiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderSelectionError {
    #[error("OpenAI configuration is incomplete: {0} is required")]
    Incomplete(&'static str),
}

pub const OPENAI_PROVIDER: &str = "openai";

impl ProviderFields {
    pub fn resolve(&self) -> Result<ProviderSelection, ProviderSelectionError> {
        let provider = self.provider.as_deref().map(str::trim).unwrap_or_default();
        if !provider.eq_ignore_ascii_case(OPENAI_PROVIDER) {
            return Ok(ProviderSelection::Default);
        }

        let base_url = required(&self.openai_base_url, "openaiBaseUrl")?;
        let api_key = required(&self.openai_api_key, "openaiApiKey")?;
        let model = required(&self.openai_model, "openaiModel")?;

        Ok(ProviderSelection::OpenAiCompatible(OpenAiEndpoint {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }))
    }

    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "provider" => &mut self.provider,
            "openaiBaseUrl" => &mut self.openai_base_url,
            "openaiApiKey" => &mut self.openai_api_key,
            "openaiModel" => &mut self.openai_model,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ProviderSelectionError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ProviderSelectionError::Incomplete(name))
}
