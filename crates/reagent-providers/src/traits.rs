//! Completion provider trait — the seam between the agent and the remote
//! language-model endpoint.

use async_trait::async_trait;

use reagent_core::types::Message;

use crate::error::ProviderError;

/// Configuration passed to each completion call.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Trait that all completion backends implement.
///
/// One request → one full reply. Failures are returned as
/// [`ProviderError`] so the agent can distinguish a broken round-trip
/// (which must not append an assistant message) from a normal reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's reply text.
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        config: &CompletionConfig,
    ) -> Result<String, ProviderError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
