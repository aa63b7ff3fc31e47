//! Ollama Transport Implementation
//!
//! Talks to a local Ollama server through its `/api/chat` endpoint, which
//! keeps the whole conversation so gleaning rounds see the earlier turns.
//!
//! # Examples
//!
//! ```no_run
//! use glean_domain::{ChatMessage, ChatTransport};
//! use glean_llm::OllamaTransport;
//!
//! let transport = OllamaTransport::default_endpoint("llama3").unwrap();
//! let reply = transport.send(&[ChatMessage::user("Say hello")]).unwrap();
//! ```

use crate::openai::{backoff_delay, build_runtime};
use crate::TransportError;
use glean_domain::{ChatMessage, ChatTransport};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for local generation; local models are slow
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API transport for local inference
pub struct OllamaTransport {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    runtime: Runtime,
    max_retries: u32,
}

/// Request body for Ollama chat API
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Response from Ollama chat API
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[allow(dead_code)]
    done: bool,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaTransport {
    /// Create a new Ollama transport
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama transport with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            runtime: build_runtime()?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new Ollama transport on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per call (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Send a conversation to Ollama
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn chat(&self, conversation: &[ChatMessage]) -> Result<String, TransportError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request_body = OllamaChatRequest {
            model: &self.model,
            messages: conversation,
            stream: false,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return response
                            .json::<OllamaChatResponse>()
                            .await
                            .map(|r| r.message.content)
                            .map_err(|e| {
                                TransportError::InvalidResponse(format!("Failed to parse response: {}", e))
                            });
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(TransportError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(TransportError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(TransportError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = backoff_delay(attempts);
                warn!(
                    "Ollama request failed (attempt {}/{}), retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::Communication("Max retries exceeded".to_string())))
    }
}

impl ChatTransport for OllamaTransport {
    type Error = TransportError;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        debug!("Sending {} message(s) to ollama/{}", conversation.len(), self.model);
        self.runtime.block_on(self.chat(conversation))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
