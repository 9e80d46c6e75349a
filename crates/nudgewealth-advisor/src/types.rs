//! Provider-facing request and response types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by LLM providers
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider not available: {provider}")]
    ProviderNotAvailable { provider: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Appended to the system prompt when JSON output is requested
const JSON_ONLY: &str = "\n\nRespond with a single valid JSON object and nothing else.";

/// One advisory completion: a system instruction plus a single user prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    /// System prompt as sent to the provider
    pub fn system_text(&self) -> String {
        if self.json_mode {
            format!("{}{}", self.system, JSON_ONLY)
        } else {
            self.system.clone()
        }
    }
}

/// Text produced by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    /// Model that answered, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Provider kind for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Ollama local LLM
    Ollama,
    /// Any OpenAI-compatible chat completions API (including OpenAI itself)
    OpenAiCompat,
    /// Anthropic Claude API
    Anthropic,
    /// No model; advisory requests always fall back to templates
    Deterministic,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "openai_compat" | "openai-compat" | "vllm" | "llamacpp" => {
                Some(Self::OpenAiCompat)
            }
            "anthropic" | "claude" => Some(Self::Anthropic),
            "deterministic" | "none" | "off" | "fallback" => Some(Self::Deterministic),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAiCompat => write!(f, "openai_compat"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Deterministic => write!(f, "deterministic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_extends_system_prompt() {
        let plain = CompletionRequest::new("Be kind.", "hi");
        assert_eq!(plain.system_text(), "Be kind.");

        let json = plain.with_json_mode();
        assert!(json.system_text().starts_with("Be kind."));
        assert!(json.system_text().contains("JSON"));
    }

    #[test]
    fn test_provider_kind_display_parses_back() {
        for kind in [
            ProviderKind::Ollama,
            ProviderKind::OpenAiCompat,
            ProviderKind::Anthropic,
            ProviderKind::Deterministic,
        ] {
            assert_eq!(ProviderKind::parse(&kind.to_string()), Some(kind));
        }
    }
}
