//! Google Gemini LLM provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResearchError};
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, MessageRole, ModelInfo, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider using the `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `model` - Model name (e.g., "gemini-2.0-flash-exp")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create with a custom base URL (proxies, regional endpoints).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    status: Option<String>,
}

fn build_request(request: &LLMRequest) -> GeminiRequest {
    let system: Vec<GeminiPart> = request
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| GeminiPart {
            text: m.content.clone(),
        })
        .collect();

    let contents = request
        .messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| GeminiContent {
            role: Some(match m.role {
                MessageRole::Assistant => "model".to_string(),
                _ => "user".to_string(),
            }),
            parts: vec![GeminiPart {
                text: m.content.clone(),
            }],
        })
        .collect();

    GeminiRequest {
        contents,
        system_instruction: (!system.is_empty()).then(|| GeminiContent {
            role: None,
            parts: system,
        }),
        generation_config: GeminiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    }
}

fn extract_text(response: &GeminiResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let body = build_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ResearchError::generation("gemini", format!("Failed to send request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error) = serde_json::from_str::<GeminiError>(&text) {
                return Err(ResearchError::generation(
                    "gemini",
                    format!(
                        "API error ({}): {}",
                        error.error.status.unwrap_or_else(|| status.to_string()),
                        error.error.message
                    ),
                ));
            }

            return Err(ResearchError::generation(
                "gemini",
                format!("API error ({}): {}", status, text),
            ));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            ResearchError::generation("gemini", format!("Failed to parse response: {}", e))
        })?;

        if gemini_response.candidates.is_empty() {
            return Err(ResearchError::generation(
                "gemini",
                "API returned no candidates",
            ));
        }

        let content = extract_text(&gemini_response);
        let usage = gemini_response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(LLMResponse { content, usage })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "gemini".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMConfig;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key", "gemini-2.0-flash-exp");
        assert_eq!(provider.model(), "gemini-2.0-flash-exp");
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let provider = GeminiProvider::with_base_url("k", "m", "http://localhost:8080/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/models/m:generateContent");
    }

    #[test]
    fn test_request_moves_system_prompt_to_instruction() {
        let config = LLMConfig::new()
            .with_system_prompt("be brief")
            .with_max_tokens(64);
        let body = build_request(&LLMRequest::from_config("hello", &config));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}}
                ],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
            }"#,
        )
        .unwrap();

        assert_eq!(extract_text(&response), "Hello, world");
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 5);
    }
}
