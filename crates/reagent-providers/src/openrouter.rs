//! OpenRouter-flavored HTTP provider for OpenAI-compatible APIs.
//!
//! Talks to any `/chat/completions` endpoint; the default base URL is
//! OpenRouter's, and the `HTTP-Referer` / `X-Title` attribution headers
//! OpenRouter expects are sent with every request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, error};

use reagent_core::config::{ConfigError, ProviderSettings};
use reagent_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message};

use crate::error::ProviderError;
use crate::traits::{CompletionConfig, CompletionProvider};

/// OpenRouter's API base.
const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

// ─────────────────────────────────────────────
// OpenRouterProvider
// ─────────────────────────────────────────────

/// Completion provider backed by an OpenAI-compatible HTTP API.
pub struct OpenRouterProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL.
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    /// Attribution headers sent with each request.
    extra_headers: HeaderMap,
}

impl std::fmt::Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl OpenRouterProvider {
    /// Create a provider from settings.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] when no key is configured —
    /// the credential check happens here, at construction, never mid-turn.
    pub fn new(settings: &ProviderSettings, model: &str) -> Result<Self, ConfigError> {
        if !settings.is_configured() {
            return Err(ConfigError::MissingApiKey);
        }

        let api_base = settings
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&settings.referer) {
            extra_headers.insert("HTTP-Referer", v);
        }
        if let Ok(v) = HeaderValue::from_str(&settings.title) {
            extra_headers.insert("X-Title", v);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Ok(OpenRouterProvider {
            client,
            api_base,
            api_key: settings.api_key.clone(),
            default_model: model.to_string(),
            extra_headers,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        config: &CompletionConfig,
    ) -> Result<String, ProviderError> {
        debug!(
            model = model,
            messages = messages.len(),
            "calling completion endpoint"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "completion endpoint error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let reply = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyReply)?;

        debug!(reply_len = reply.len(), "completion reply received");
        Ok(reply)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        "OpenRouter"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
