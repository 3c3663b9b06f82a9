//! Configuration types for the research pipeline

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ResearchError};
use crate::llm::LLMConfig;

/// Topic used when the caller does not supply one
pub const DEFAULT_TOPIC: &str = "Artificial Intelligence in Education";

/// Main configuration for a research session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LLMProviderConfig,

    /// Generation parameters shared by every agent
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Where the final paper is written
    #[serde(default)]
    pub output: OutputConfig,

    /// Science agent behaviour
    #[serde(default)]
    pub science: ScienceConfig,

    /// Topic used when none is given
    #[serde(default = "default_topic")]
    pub default_topic: String,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            llm: LLMProviderConfig::default(),
            generation: GenerationConfig::default(),
            output: OutputConfig::default(),
            science: ScienceConfig::default(),
            default_topic: default_topic(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMProviderConfig {
    /// Provider type
    #[serde(default)]
    pub provider: LLMProvider,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (if not set, read from the provider's env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL (for custom or compatible endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl LLMProvider {
    /// Environment variable holding this provider's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => "GEMINI_API_KEY",
            LLMProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(LLMProvider::Gemini),
            "openai" => Ok(LLMProvider::OpenAI),
            other => Err(ResearchError::Configuration(format!(
                "Invalid LLM provider: {}",
                other
            ))),
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per model call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Optional per-call timeout. Unset means calls may wait indefinitely.
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1024
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: None,
        }
    }
}

impl GenerationConfig {
    /// Per-call LLM settings derived from this configuration
    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig::new()
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the paper is written into (created if absent)
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

/// Science agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScienceConfig {
    /// Which hypotheses are handed to the experiment runner
    #[serde(default)]
    pub hypothesis_source: HypothesisSource,
}

/// Source of the hypotheses the Science agent executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisSource {
    /// Always run the two fixed placeholder hypotheses
    #[default]
    Placeholder,
    /// Run the hypotheses parsed from the model's experiment design
    Designed,
}

/// Builder for ResearchConfig
pub struct ConfigBuilder {
    config: ResearchConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ResearchConfig::default(),
        }
    }

    /// Set the LLM provider configuration
    pub fn llm(mut self, config: LLMProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(key.into());
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = model.into();
        self
    }

    /// Set generation parameters
    pub fn generation(mut self, config: GenerationConfig) -> Self {
        self.config.generation = config;
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.directory = dir.into();
        self
    }

    /// Set the hypothesis source
    pub fn hypothesis_source(mut self, source: HypothesisSource) -> Self {
        self.config.science.hypothesis_source = source;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ResearchConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchConfig {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `autoresearch.toml`, then the file named by `AUTORESEARCH_CONFIG_PATH`
    /// 3. `AUTORESEARCH_` environment overrides (`__` separates sections)
    /// 4. Provider API key env var if no key was configured
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file is invalid or the API key is missing.
    pub fn load() -> Result<Self> {
        let mut config = Self::layered(None)?;
        config.resolve_api_key();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the result is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: ResearchConfig =
            Figment::from(Serialized::defaults(ResearchConfig::default()))
                .merge(Toml::file(path.as_ref()))
                .extract()
                .map_err(|e| {
                    ResearchError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.resolve_api_key();
        config.validate()?;
        Ok(config)
    }

    /// Merge defaults, config files, and environment without validating.
    ///
    /// `file` replaces both `autoresearch.toml` and `AUTORESEARCH_CONFIG_PATH`.
    /// Callers that apply further overrides (command-line flags) finish with
    /// [`resolve_api_key`](Self::resolve_api_key) and [`validate`](Self::validate).
    pub fn layered(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ResearchConfig::default()));

        match file {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                figment = figment.merge(Toml::file("autoresearch.toml"));
                if let Ok(path) = std::env::var("AUTORESEARCH_CONFIG_PATH") {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment
            .merge(Env::prefixed("AUTORESEARCH_").split("__"))
            .extract()
            .map_err(|e| ResearchError::Configuration(format!("Failed to load configuration: {}", e)))
    }

    /// Fill in the API key from the provider's env var when none is configured.
    pub fn resolve_api_key(&mut self) {
        if self.llm.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
            return;
        }
        self.llm.api_key = std::env::var(self.llm.provider.api_key_env_var())
            .ok()
            .filter(|k| !k.trim().is_empty());
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let has_key = self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_key {
            return Err(ResearchError::Configuration(format!(
                "API key not found: set {} or llm.api_key",
                self.llm.provider.api_key_env_var()
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "Model name must not be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ResearchError::Configuration(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.generation.temperature
            )));
        }

        if self.generation.max_tokens == 0 {
            return Err(ResearchError::Configuration(
                "max_tokens must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
