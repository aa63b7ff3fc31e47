//! A concrete transport chosen at runtime from configuration

use crate::ollama::OllamaTransport;
use crate::openai::ChatCompletionsTransport;
use crate::TransportError;
use glean_domain::{ChatMessage, ChatTransport};

/// Any HTTP transport `LlmConfig::build` can produce
pub enum LlmClient {
    /// OpenAI-compatible chat completions (OpenAI, Anthropic, Gemini, custom)
    ChatCompletions(ChatCompletionsTransport),

    /// Local Ollama server
    Ollama(OllamaTransport),
}

impl ChatTransport for LlmClient {
    type Error = TransportError;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        match self {
            LlmClient::ChatCompletions(t) => t.send(conversation),
            LlmClient::Ollama(t) => t.send(conversation),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            LlmClient::ChatCompletions(t) => t.model_name(),
            LlmClient::Ollama(t) => t.model_name(),
        }
    }
}
