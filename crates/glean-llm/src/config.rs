//! Configuration for model transports (the `[llm]` section)

use crate::client::LlmClient;
use crate::ollama::OllamaTransport;
use crate::openai::ChatCompletionsTransport;
use crate::provider::{api_key_hint, resolve_api_key, Provider};
use crate::TransportError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Default model when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Most attempts `max_retries` may ask for
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Model transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier; the provider is detected from it
    pub model: String,

    /// API key; read from the provider's environment variable when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override of the provider's base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Timeout for a single request (seconds)
    pub timeout_secs: u64,

    /// Attempts per call before the failure is reported
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

impl LlmConfig {
    /// Config for a given model with default settings
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Detected provider of the configured model
    pub fn provider(&self) -> Option<Provider> {
        Provider::detect(&self.model)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("llm.timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 || self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!("llm.max_retries must be between 1 and {}", MAX_RETRIES_LIMIT));
        }
        Ok(())
    }

    /// Build the transport this configuration describes
    ///
    /// Ollama needs no key. Every other provider, including unknown model
    /// names routed to an OpenAI-compatible endpoint, needs one from the
    /// config or the environment, unless `base_url` points at a custom server.
    pub fn build(&self) -> Result<LlmClient, TransportError> {
        self.validate().map_err(TransportError::Other)?;

        let provider = self.provider();
        let timeout = Duration::from_secs(self.timeout_secs);

        if provider == Some(Provider::Ollama) {
            let endpoint = self
                .base_url
                .clone()
                .unwrap_or_else(|| Provider::Ollama.default_base_url().to_string());
            let model = Provider::Ollama.api_model_name(&self.model);
            info!("Using Ollama model '{}' at {}", model, endpoint);
            let transport = OllamaTransport::with_timeout(endpoint, model, timeout)?
                .with_max_retries(self.max_retries);
            return Ok(LlmClient::Ollama(transport));
        }

        let api_key = self.api_key.clone().or_else(|| resolve_api_key(provider));
        if api_key.is_none() && self.base_url.is_none() {
            return Err(TransportError::MissingApiKey {
                model: self.model.clone(),
                env_var: api_key_hint(provider),
            });
        }

        let effective = provider.unwrap_or(Provider::OpenAi);
        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| effective.default_base_url().to_string());
        let model = effective.api_model_name(&self.model);

        info!(
            "Using {} model '{}' at {}",
            provider.map(|p| p.as_str()).unwrap_or("openai-compatible"),
            model,
            base_url
        );
        let transport = ChatCompletionsTransport::with_timeout(base_url, model, api_key, timeout)?
            .with_max_retries(self.max_retries);
        Ok(LlmClient::ChatCompletions(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LlmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = LlmConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let config = LlmConfig::for_model("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_retries_bounds() {
        let mut config = LlmConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_err());

        config.max_retries = MAX_RETRIES_LIMIT;
        assert!(config.validate().is_ok());

        config.max_retries = 100;
        let err = config.validate().unwrap_err();
        assert!(err.contains("llm.max_retries"));
    }

    #[test]
    fn test_build_ollama_needs_no_key() {
        let client = LlmConfig::for_model("ollama/llama3").build().unwrap();
        assert!(matches!(client, LlmClient::Ollama(_)));
    }

    #[test]
    fn test_build_with_explicit_key() {
        let mut config = LlmConfig::for_model("gemini/gemini-pro");
        config.api_key = Some("g-key".to_string());

        let client = config.build().unwrap();
        assert!(matches!(client, LlmClient::ChatCompletions(_)));
        assert_eq!(glean_domain::ChatTransport::model_name(&client), "gemini-pro");
    }

    #[test]
    fn test_build_with_custom_base_url_and_no_key() {
        let mut config = LlmConfig::for_model("local-model");
        config.base_url = Some("http://localhost:8000/v1".to_string());
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LlmConfig = toml::from_str(r#"model = "claude-sonnet-4-5""#).unwrap();
        assert_eq!(config.model, "claude-sonnet-4-5");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.provider(), Some(Provider::Anthropic));
    }
}
