//! Glean LLM Transport Layer
//!
//! Implementations of the `ChatTransport` trait from `glean-domain`.
//!
//! # Transports
//!
//! - `MockTransport`: scripted responses for testing, records every conversation
//! - `ChatCompletionsTransport`: OpenAI-compatible `chat/completions` endpoints
//!   (OpenAI, Anthropic, Gemini)
//! - `OllamaTransport`: local Ollama `/api/chat`
//! - `LlmClient`: whichever of the HTTP transports `LlmConfig` selects
//!
//! # Examples
//!
//! ```
//! use glean_domain::{ChatMessage, ChatTransport};
//! use glean_llm::MockTransport;
//!
//! let transport = MockTransport::scripted(["first", "second"]);
//! let conversation = vec![ChatMessage::user("hello")];
//! assert_eq!(transport.send(&conversation).unwrap(), "first");
//! assert_eq!(transport.send(&conversation).unwrap(), "second");
//! assert_eq!(transport.call_count(), 2);
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod ollama;
pub mod openai;
pub mod provider;

use glean_domain::{ChatMessage, ChatTransport, Role};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use client::LlmClient;
pub use config::LlmConfig;
pub use ollama::OllamaTransport;
pub use openai::ChatCompletionsTransport;
pub use provider::Provider;

/// Errors that can occur while talking to a model
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key configured for a provider that needs one
    #[error("API key required for model '{model}'. Set {env_var} or pass api_key in the [llm] config")]
    MissingApiKey {
        /// Model that was requested
        model: String,
        /// Environment variable(s) that would supply the key
        env_var: String,
    },

    /// Scripted failure or exhausted script in `MockTransport`
    #[error("Mock transport: {0}")]
    Script(String),

    /// Generic error
    #[error("Transport error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Mock transport for deterministic testing
///
/// Replies are resolved in this order:
/// 1. a rule whose needle occurs in the latest user turn
/// 2. the next entry of the script
/// 3. the default response, if one was set
///
/// With nothing left to answer, `send` fails with [`TransportError::Script`].
/// Clones share the script and the recorded conversations.
///
/// # Examples
///
/// ```
/// use glean_domain::{ChatMessage, ChatTransport};
/// use glean_llm::MockTransport;
///
/// let transport = MockTransport::new("fallback").with_rule("Y or N", "Y");
/// assert_eq!(transport.send(&[ChatMessage::user("Answer Y or N")]).unwrap(), "Y");
/// assert_eq!(transport.send(&[ChatMessage::user("anything")]).unwrap(), "fallback");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    default_response: Option<String>,
    rules: Vec<(String, String)>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    conversations: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockTransport {
    /// Create a mock that answers every call with the same response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Create a mock that answers calls from a script, in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = responses
            .into_iter()
            .map(|r| Scripted::Reply(r.into()))
            .collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            ..Self::default()
        }
    }

    /// Answer `reply` whenever the latest user turn contains `needle`
    ///
    /// Rules do not consume the script.
    pub fn with_rule(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), reply.into()));
        self
    }

    /// Append a response to the script
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Scripted::Reply(response.into()));
    }

    /// Append a failure to the script
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Scripted::Fail(message.into()));
    }

    /// Number of times `send` was called
    pub fn call_count(&self) -> usize {
        lock(&self.conversations).len()
    }

    /// Every conversation sent so far, in call order
    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        lock(&self.conversations).clone()
    }

    /// Number of calls whose latest user turn contained `needle`
    pub fn calls_containing(&self, needle: &str) -> usize {
        lock(&self.conversations)
            .iter()
            .filter(|c| last_user_turn(c).is_some_and(|t| t.contains(needle)))
            .count()
    }

    /// Forget recorded conversations
    pub fn reset(&self) {
        lock(&self.conversations).clear();
    }
}

impl ChatTransport for MockTransport {
    type Error = TransportError;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        lock(&self.conversations).push(conversation.to_vec());

        if let Some(turn) = last_user_turn(conversation) {
            if let Some((_, reply)) = self.rules.iter().find(|(needle, _)| turn.contains(needle.as_str())) {
                return Ok(reply.clone());
            }
        }

        match lock(&self.script).pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(TransportError::Script(message)),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| TransportError::Script("script exhausted".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn last_user_turn(conversation: &[ChatMessage]) -> Option<&str> {
    conversation
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
