//! Provider detection from model names
//!
//! The model identifier decides which API is called and which environment
//! variable holds its key, e.g. `gpt-4.1` → OpenAI / `OPENAI_API_KEY`,
//! `claude-sonnet-4-5` → Anthropic / `ANTHROPIC_API_KEY`,
//! `gemini/gemini-pro` → Gemini / `GEMINI_API_KEY`, `ollama/llama3` → local Ollama.

use std::fmt;

/// A model provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// OpenAI
    OpenAi,

    /// Anthropic (through its OpenAI-compatible endpoint)
    Anthropic,

    /// Google Gemini (through its OpenAI-compatible endpoint)
    Gemini,

    /// Local Ollama server
    Ollama,
}

/// Providers that need an API key, in fallback lookup order
const KEYED_PROVIDERS: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Gemini];

impl Provider {
    /// Model name prefixes that select this provider
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => &["gpt-", "o1-", "o3-", "o4-"],
            Provider::Anthropic => &["claude-"],
            Provider::Gemini => &["gemini/", "gemini-"],
            Provider::Ollama => &["ollama/"],
        }
    }

    /// Detect the provider from a model name (case-insensitive prefix match)
    pub fn detect(model: &str) -> Option<Self> {
        let model = model.to_lowercase();
        [Provider::OpenAi, Provider::Anthropic, Provider::Gemini, Provider::Ollama]
            .into_iter()
            .find(|p| p.prefixes().iter().any(|prefix| model.starts_with(prefix)))
    }

    /// Environment variable holding the API key, if the provider needs one
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Base URL of the provider's API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Provider::Ollama => "http://localhost:11434",
        }
    }

    /// Model name as the provider's API expects it
    ///
    /// Routing prefixes (`gemini/`, `ollama/`) are stripped.
    pub fn api_model_name<'a>(&self, model: &'a str) -> &'a str {
        let routing_prefix = match self {
            Provider::Gemini => "gemini/",
            Provider::Ollama => "ollama/",
            _ => return model,
        };
        match model.get(..routing_prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(routing_prefix) => &model[routing_prefix.len()..],
            _ => model,
        }
    }

    /// Get the provider name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the API key for a provider from the process environment
pub fn resolve_api_key(provider: Option<Provider>) -> Option<String> {
    resolve_api_key_with(provider, |var| std::env::var(var).ok())
}

/// Resolve the API key through an arbitrary variable lookup
///
/// A detected provider only reads its own variable. An undetected provider
/// takes the first key present among all keyed providers.
pub fn resolve_api_key_with<F>(provider: Option<Provider>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |var: &str| lookup(var).filter(|k| !k.trim().is_empty());

    match provider {
        Some(p) => p.env_var().and_then(non_empty),
        None => KEYED_PROVIDERS
            .iter()
            .filter_map(|p| p.env_var())
            .find_map(non_empty),
    }
}

/// Human-readable hint naming the variable(s) that supply a key
pub fn api_key_hint(provider: Option<Provider>) -> String {
    match provider.and_then(|p| p.env_var()) {
        Some(var) => var.to_string(),
        None => {
            let vars: Vec<&str> = KEYED_PROVIDERS.iter().filter_map(|p| p.env_var()).collect();
            format!("one of: {}", vars.join(", "))
        }
    }
}
