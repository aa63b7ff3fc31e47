//! OpenAI-compatible chat completions transport
//!
//! OpenAI, Anthropic and Gemini all accept the same `POST {base_url}/chat/completions`
//! request shape, so one transport serves all three.
//!
//! # Features
//!
//! - Bearer authentication
//! - Configurable endpoint, model and timeout
//! - Retry logic with exponential backoff on network errors, 429 and 5xx
//!
//! The synchronous [`ChatTransport`] impl drives the async request on a
//! runtime owned by the transport, so it must not be called from inside
//! another tokio runtime.

use crate::TransportError;
use glean_domain::{ChatMessage, ChatTransport};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default timeout for a single request
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Longest wait between two attempts
pub const MAX_BACKOFF_SECS: u64 = 60;

/// Transport for OpenAI-compatible `chat/completions` endpoints
pub struct ChatCompletionsTransport {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    runtime: Runtime,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

impl ChatCompletionsTransport {
    /// Create a new transport
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root without the `/chat/completions` suffix
    /// - `model`: model name as the API expects it
    /// - `api_key`: sent as a bearer token when present
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new transport with an explicit request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let runtime = build_runtime()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
            runtime,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts per call (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Endpoint that requests are posted to
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send a conversation and return the first choice's content
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable after all retries
    /// - The key is rejected
    /// - The model is not available
    /// - The response has no content
    pub async fn chat(&self, conversation: &[ChatMessage]) -> Result<String, TransportError> {
        let url = self.endpoint();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: conversation,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut request = self.client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
                            TransportError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return first_choice_content(parsed);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(TransportError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        let error_text = response.text().await.unwrap_or_default();
                        return Err(TransportError::Communication(format!(
                            "Authentication failed (HTTP {}): {}",
                            status, error_text
                        )));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(TransportError::RateLimitExceeded);
                    } else {
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
                    "Request to {} failed (attempt {}/{}), retrying in {:?}",
                    url, attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::Communication("Max retries exceeded".to_string())))
    }
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, TransportError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TransportError::InvalidResponse("Response has no message content".to_string()))
}

/// Wait after the given failed attempt (1-based): 1s, 2s, 4s, ... capped
/// at [`MAX_BACKOFF_SECS`]
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
}

pub(crate) fn build_runtime() -> Result<Runtime, TransportError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TransportError::Other(format!("Failed to start runtime: {}", e)))
}

impl ChatTransport for ChatCompletionsTransport {
    type Error = TransportError;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        debug!("Sending {} message(s) to {}", conversation.len(), self.model);
        self.runtime.block_on(self.chat(conversation))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport =
            ChatCompletionsTransport::new("https://api.openai.com/v1/", "gpt-4.1", Some("sk".into())).unwrap();
        assert_eq!(transport.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(transport.model_name(), "gpt-4.1");
        assert_eq!(transport.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_with_max_retries_at_least_one() {
        let transport = ChatCompletionsTransport::new("http://localhost:1", "m", None)
            .unwrap()
            .with_max_retries(0);
        assert_eq!(transport.max_retries, 1);
    }

    #[test]
    fn test_backoff_delay_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert_eq!(backoff_delay(7), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(65), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::user("hello")];
        let body = ChatCompletionRequest {
            model: "gpt-4.1",
            messages: &messages,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4.1");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(response).unwrap(), "hi");
    }

    #[test]
    fn test_missing_content_is_invalid_response() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            first_choice_content(response),
            Err(TransportError::InvalidResponse(_))
        ));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_choice_content(empty).is_err());
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let transport = ChatCompletionsTransport::new("http://localhost:1", "gpt-4.1", None)
            .unwrap()
            .with_max_retries(1);

        let result = transport.send(&[ChatMessage::user("test")]);
        assert!(matches!(result, Err(TransportError::Communication(_))));
    }
}
