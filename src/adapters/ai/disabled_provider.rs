//! Provider that refuses every request.
//!
//! Used when no API key is configured; every step then narrates with its
//! fallback text.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

#[derive(Debug, Clone, Default)]
pub struct DisabledAIProvider;

impl DisabledAIProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AIProvider for DisabledAIProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::unavailable("text generation is disabled"))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("disabled", "none")
    }
}
