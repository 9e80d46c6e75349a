//! LLM provider implementations

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Default request timeout for provider HTTP calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn timeout_from_env() -> Duration {
    let secs = std::env::var("NUDGEWEALTH_LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build HTTP client, using defaults");
            reqwest::Client::new()
        })
}

fn network_error(e: reqwest::Error) -> LlmError {
    LlmError::NetworkError {
        message: e.to_string(),
    }
}

fn invalid_response(e: impl std::fmt::Display) -> LlmError {
    LlmError::InvalidResponse {
        message: e.to_string(),
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::RequestFailed {
        message: format!("HTTP {}: {}", status, body),
    })
}

// ============================================================================
// Ollama Provider (Local, Default)
// ============================================================================

/// Configuration for Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("NUDGEWEALTH_OLLAMA_URL", "http://localhost:11434"),
            model: env_or("NUDGEWEALTH_OLLAMA_MODEL", "llama3.1:8b"),
            timeout: timeout_from_env(),
        }
    }
}

/// Ollama local LLM provider
pub struct OllamaProvider {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(OllamaConfig::default())
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = OllamaRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            system: request.system_text(),
            stream: false,
            format: request.json_mode.then_some("json"),
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        let reply: OllamaResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(invalid_response)?;

        Ok(CompletionResponse {
            content: reply.response.trim().to_string(),
            model: Some(self.config.model.clone()),
        })
    }
}

// ============================================================================
// OpenAI-Compatible Provider
// ============================================================================

/// Configuration for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("NUDGEWEALTH_OPENAI_BASE_URL", "https://api.openai.com/v1"),
            api_key: std::env::var("NUDGEWEALTH_OPENAI_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: env_or("NUDGEWEALTH_OPENAI_MODEL", "gpt-4o-mini"),
            timeout: timeout_from_env(),
        }
    }
}

/// OpenAI-compatible API provider (OpenAI, vLLM, llama.cpp, etc.)
pub struct OpenAiCompatProvider {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(OpenAiCompatConfig::default())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "OpenAI-Compatible"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompat
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.base_url);
        let mut req = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }
        req.send().await.is_ok()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let system = request.system_text();
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatTurn {
                    role: "system",
                    content: &system,
                },
                ChatTurn {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request
                .json_mode
                .then(|| serde_json::json!({"type": "json_object"})),
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(network_error)?;
        let reply: ChatResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(invalid_response)?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| invalid_response("response contained no choices"))?;

        Ok(CompletionResponse {
            content,
            model: reply.model.or_else(|| Some(self.config.model.clone())),
        })
    }
}

// ============================================================================
// Anthropic Provider
// ============================================================================

/// Configuration for Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok()?,
            model: env_or("NUDGEWEALTH_ANTHROPIC_MODEL", "claude-3-5-haiku-latest"),
            base_url: env_or("NUDGEWEALTH_ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
            timeout: timeout_from_env(),
        })
    }
}

/// Anthropic Claude API provider
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Option<Self> {
        Some(Self::new(AnthropicConfig::from_env()?))
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: [ChatTurn<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens.unwrap_or(1024),
            system: request.system_text(),
            messages: [ChatTurn {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        let url = format!("{}/v1/messages", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        let reply: AnthropicResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(invalid_response)?;

        Ok(CompletionResponse {
            content: reply.content.into_iter().map(|b| b.text).collect(),
            model: Some(self.config.model.clone()),
        })
    }
}

// ============================================================================
// Deterministic Provider (Fallback)
// ============================================================================

/// Provider used when no model is configured.
///
/// Every completion fails, so callers use their templated fallback.
#[derive(Debug, Default)]
pub struct DeterministicProvider;

impl DeterministicProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmProvider for DeterministicProvider {
    fn name(&self) -> &'static str {
        "Deterministic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Deterministic
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Err(LlmError::ProviderNotAvailable {
            provider: "deterministic".to_string(),
        })
    }
}
