//! LLM Router - Selects and manages the configured provider

use std::sync::Arc;

use crate::providers::*;
use crate::types::*;

/// Selects a provider from configuration and forwards completions to it
#[derive(Clone)]
pub struct LlmRouter {
    provider: Arc<dyn LlmProvider>,
    kind: ProviderKind,
}

impl LlmRouter {
    /// Create a router with a specific provider
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let kind = provider.kind();
        Self { provider, kind }
    }

    /// Create a router from environment variables
    ///
    /// Reads `NUDGEWEALTH_LLM_PROVIDER` to select the provider:
    /// - `ollama` (default): Local Ollama instance
    /// - `openai` / `openai_compat`: OpenAI or any compatible server
    /// - `anthropic`: Anthropic Claude API
    /// - `deterministic` / `none`: no model, templated messages only
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors)
        let _ = dotenvy::dotenv();

        let provider_name =
            std::env::var("NUDGEWEALTH_LLM_PROVIDER").unwrap_or_else(|_| "ollama".to_string());

        let kind = ProviderKind::parse(&provider_name).unwrap_or_else(|| {
            tracing::warn!(provider = %provider_name, "unknown LLM provider, using ollama");
            ProviderKind::Ollama
        });

        Self::from_kind(kind)
    }

    /// Create a router for a specific provider kind
    pub fn from_kind(kind: ProviderKind) -> Self {
        let provider: Arc<dyn LlmProvider> = match kind {
            ProviderKind::Ollama => Arc::new(OllamaProvider::from_env()),
            ProviderKind::OpenAiCompat => Arc::new(OpenAiCompatProvider::from_env()),
            ProviderKind::Anthropic => match AnthropicProvider::from_env() {
                Some(p) => Arc::new(p),
                None => {
                    tracing::warn!("Anthropic API key not found, using deterministic fallback");
                    Arc::new(DeterministicProvider::new())
                }
            },
            ProviderKind::Deterministic => Arc::new(DeterministicProvider::new()),
        };

        Self::new(provider)
    }

    /// Get the current provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get the provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Whether a real model sits behind this router
    pub fn is_model_backed(&self) -> bool {
        self.kind != ProviderKind::Deterministic
    }

    /// Check if the provider is available
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Complete a request using the current provider
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.provider.complete(request).await
    }
}

impl Default for LlmRouter {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_provider_always_fails_over() {
        let router = LlmRouter::from_kind(ProviderKind::Deterministic);
        assert!(router.is_available().await);
        assert!(!router.is_model_backed());

        let request = CompletionRequest::new("Be brief.", "Hello");
        let result = router.complete(request).await;
        assert!(matches!(result, Err(LlmError::ProviderNotAvailable { .. })));
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(ProviderKind::parse("ollama"), Some(ProviderKind::Ollama));
        assert_eq!(ProviderKind::parse("Claude"), Some(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenAiCompat));
        assert_eq!(ProviderKind::parse(" none "), Some(ProviderKind::Deterministic));
        assert_eq!(ProviderKind::parse("gemini"), None);
    }
}
