use std::sync::Arc;

use crate::domain::ProviderSelection;

use super::LlmClient;

/// Builds the provider client for one request. Implementations hold the
/// process-wide default provider; per-request overrides arrive through the
/// selection.
pub trait LlmClientFactory: Send + Sync {
    fn create(&self, selection: &ProviderSelection) -> Arc<dyn LlmClient>;
}
