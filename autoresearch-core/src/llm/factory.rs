//! Factory for creating LLM providers from configuration

use crate::config::{LLMProvider as LLMProviderType, LLMProviderConfig};
use crate::error::{Result, ResearchError};
use crate::llm::LLMProvider;
use std::sync::Arc;

#[cfg(feature = "llm-gemini")]
use crate::llm::providers::gemini::GeminiProvider;

#[cfg(feature = "llm-openai")]
use crate::llm::providers::openai::OpenAIProvider;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or the
    /// provider's feature is not compiled in.
    pub async fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        match config.provider {
            #[cfg(feature = "llm-gemini")]
            LLMProviderType::Gemini => {
                let api_key = api_key(config)?;
                let provider = match &config.base_url {
                    Some(base_url) => {
                        GeminiProvider::with_base_url(api_key, config.model.clone(), base_url.clone())
                    }
                    None => GeminiProvider::new(api_key, config.model.clone()),
                };
                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-gemini"))]
            LLMProviderType::Gemini => Err(ResearchError::Configuration(
                "Gemini provider requires 'llm-gemini' feature".to_string(),
            )),

            #[cfg(feature = "llm-openai")]
            LLMProviderType::OpenAI => {
                let api_key = api_key(config)?;
                let provider = match &config.base_url {
                    Some(base_url) => {
                        OpenAIProvider::with_base_url(api_key, config.model.clone(), base_url.clone())
                    }
                    None => OpenAIProvider::new(api_key, config.model.clone()),
                };
                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-openai"))]
            LLMProviderType::OpenAI => Err(ResearchError::Configuration(
                "OpenAI provider requires 'llm-openai' feature".to_string(),
            )),
        }
    }
}

/// Configured key, falling back to the provider's env var
#[allow(dead_code)]
fn api_key(config: &LLMProviderConfig) -> Result<String> {
    config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(config.provider.api_key_env_var()).ok())
        .ok_or_else(|| {
            ResearchError::Configuration(format!(
                "{} environment variable not set",
                config.provider.api_key_env_var()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "llm-gemini")]
    #[tokio::test]
    async fn test_create_gemini_with_configured_key() {
        let config = LLMProviderConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let provider = LLMProviderFactory::create(&config).await.unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "gemini");
        assert_eq!(info.model_name, "gemini-2.0-flash-exp");
    }

    #[cfg(not(feature = "llm-openai"))]
    #[tokio::test]
    async fn test_openai_without_feature_is_configuration_error() {
        let config = LLMProviderConfig {
            provider: LLMProviderType::OpenAI,
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let err = LLMProviderFactory::create(&config).await.err().unwrap();
        assert!(matches!(err, ResearchError::Configuration(_)));
    }
}
