//! Model call boundary
//!
//! Every agent talks to a language model through [`LLMProvider`]. The
//! pipeline only ever needs `generate(prompt) -> text`; the richer request
//! type exists so HTTP providers can carry roles and sampling options.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for LLM operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Temperature for generation (0.0-2.0, default: 0.7)
    pub temperature: f32,

    /// Maximum tokens to generate (default: 1024)
    pub max_tokens: usize,

    /// System prompt for context
    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            system_prompt: None,
        }
    }
}

impl LLMConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to an LLM provider
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl LLMRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message {
                role: MessageRole::User,
                content: prompt.into(),
            }],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create a request from a prompt and per-call configuration
    pub fn from_config(prompt: impl Into<String>, config: &LLMConfig) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &config.system_prompt {
            messages.push(Message {
                role: MessageRole::System,
                content: system.clone(),
            });
        }
        messages.push(Message {
            role: MessageRole::User,
            content: prompt.into(),
        });

        Self {
            messages,
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }

    /// Non-system message text, joined by newlines
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,

    /// Token usage information
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Trait for LLM provider implementations.
///
/// Implement at least one of `generate` or `generate_request`; each has a
/// default expressed in terms of the other. Calls may suspend for as long as
/// the remote service takes to answer.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text for a single prompt
    async fn generate(&self, prompt: &str, config: &LLMConfig) -> Result<String> {
        let request = LLMRequest::from_config(prompt, config);
        let response = self.generate_request(&request).await?;
        Ok(response.content)
    }

    /// Generate text from a structured request
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let config = LLMConfig {
            temperature: request.temperature.unwrap_or(0.7),
            max_tokens: request.max_tokens.unwrap_or(1024),
            system_prompt: request
                .messages
                .iter()
                .find(|m| m.role == MessageRole::System)
                .map(|m| m.content.clone()),
        };

        let content = self.generate(&request.prompt_text(), &config).await?;
        Ok(LLMResponse {
            content,
            usage: None,
        })
    }

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Model information
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

pub mod factory;
pub mod providers;
pub mod stub;

pub use factory::LLMProviderFactory;
pub use stub::{CallEvent, CallPhase, PromptCategory, ScriptedProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_out_of_range_temperature() {
        let hot = LLMConfig::new().with_temperature(3.2).with_max_tokens(256);
        assert_eq!(hot.temperature, 2.0);
        assert_eq!(hot.max_tokens, 256);
        assert!(hot.system_prompt.is_none());

        assert_eq!(LLMConfig::new().with_temperature(-0.4).temperature, 0.0);
    }

    #[test]
    fn test_request_from_config_places_system_first() {
        let config = LLMConfig::new().with_system_prompt("sys");
        let request = LLMRequest::from_config("hello", &config);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].content, "hello");
        assert_eq!(request.max_tokens, Some(1024));
    }

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn generate(&self, prompt: &str, _config: &LLMConfig) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[tokio::test]
    async fn test_generate_request_defaults_to_generate() {
        let response = EchoProvider
            .generate_request(&LLMRequest::from_prompt("ping"))
            .await
            .unwrap();
        assert_eq!(response.content, "echo: ping");
        assert!(response.usage.is_none());
    }
}
