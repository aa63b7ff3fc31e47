//! Trait definitions for external interactions
//!
//! These traits define the boundaries between extraction logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::ChatMessage;
use std::sync::Arc;

/// Trait for sending a conversation to a language model
///
/// Implemented by the infrastructure layer (glean-llm). Calls are blocking:
/// the extractor treats one call as an opaque request/response step, and any
/// timeout or retry policy belongs to the implementation.
pub trait ChatTransport {
    /// Error type for transport failures (network, auth, provider)
    type Error: std::fmt::Display;

    /// Send the full conversation so far and return the model's reply
    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error>;

    /// Name of the model behind this transport, for logging
    fn model_name(&self) -> &str {
        "llm"
    }
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    type Error = T::Error;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        (**self).send(conversation)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    type Error = T::Error;

    fn send(&self, conversation: &[ChatMessage]) -> Result<String, Self::Error> {
        (**self).send(conversation)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
