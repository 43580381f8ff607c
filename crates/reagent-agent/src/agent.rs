//! The conversation agent — one user message in, one turn result out.
//!
//! A turn makes at most two completion round-trips: the first for the
//! model's reply, and a second only when that reply is a well-formed
//! request for a registered capability (whose outcome is fed back as a
//! synthetic user message). Capability chaining across turns happens only
//! through further `process_message` calls.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use reagent_core::types::{Message, TurnResult};
use reagent_providers::{CompletionConfig, CompletionProvider, ProviderError};

use crate::capabilities::CapabilityRegistry;
use crate::classify::{classify, ParsedReply};
use crate::prompt::build_system_prompt;

/// What the caller sees when a completion round-trip fails. The detail goes
/// into `TurnResult.error`; this text is all that reaches the model-facing
/// response field.
const COMPLETION_FAILURE_TEXT: &str =
    "I couldn't reach the language model. Please try again.";

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// A per-session conversation agent.
///
/// Owns its conversation exclusively. Calls on one `Agent` must be
/// serialized by the caller (the HTTP gateway wraps each agent in a mutex);
/// distinct agents are fully independent.
pub struct Agent {
    provider: Arc<dyn CompletionProvider>,
    capabilities: Arc<CapabilityRegistry>,
    model: String,
    request_config: CompletionConfig,
    conversation: Vec<Message>,
}

impl Agent {
    /// Create a new agent.
    ///
    /// The provider is already credentialed — a missing API key fails at
    /// provider construction, so no turn can ever run without one.
    /// `model` defaults to the provider's default.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        capabilities: Arc<CapabilityRegistry>,
        model: Option<String>,
        request_config: Option<CompletionConfig>,
    ) -> Self {
        let model = model.unwrap_or_else(|| provider.default_model().to_string());

        Self {
            provider,
            capabilities,
            model,
            request_config: request_config.unwrap_or_default(),
            conversation: Vec::new(),
        }
    }

    /// Process one user message.
    ///
    /// Appends the user message, obtains the model's reply, and — when the
    /// reply is a well-formed request for a registered capability — invokes
    /// it once and obtains a follow-up reply with the outcome in context.
    pub async fn process_message(&mut self, user_text: &str) -> TurnResult {
        self.conversation.push(Message::user(user_text));

        let reply = match self.complete().await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "completion call failed");
                return TurnResult::failed(COMPLETION_FAILURE_TEXT, e.to_string());
            }
        };
        self.conversation.push(Message::assistant(reply.clone()));

        let request = match classify(&reply) {
            ParsedReply::PlainText(text) => {
                debug!(reply_len = text.len(), "plain reply");
                return TurnResult::plain(text);
            }
            ParsedReply::CapabilityRequest(req) => req,
        };

        // Unregistered capability name: fall through to returning the
        // reply as ordinary text. The caller sees the literal reply.
        let outcome = match self
            .capabilities
            .invoke(&request.name, request.parameters)
            .await
        {
            Ok(outcome) => outcome,
            Err(unknown) => {
                debug!(capability = %unknown.0, "requested capability not registered");
                return TurnResult::plain(reply);
            }
        };

        info!(capability = %request.name, "capability invoked");

        self.conversation
            .push(Message::user(render_outcome(&request.name, &outcome)));

        let follow_up = match self.complete().await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "follow-up completion call failed");
                return TurnResult {
                    response: COMPLETION_FAILURE_TEXT.to_string(),
                    tool_used: Some(request.name),
                    tool_reasoning: Some(request.reasoning),
                    tool_result: Some(outcome),
                    error: Some(e.to_string()),
                };
            }
        };
        self.conversation.push(Message::assistant(follow_up.clone()));

        TurnResult {
            response: follow_up,
            tool_used: Some(request.name),
            tool_reasoning: Some(request.reasoning),
            tool_result: Some(outcome),
            error: None,
        }
    }

    /// Truncate the conversation to empty. Always succeeds.
    pub fn reset(&mut self) {
        self.conversation.clear();
    }

    /// A defensive copy of the conversation so far.
    pub fn history(&self) -> Vec<Message> {
        self.conversation.clone()
    }

    /// The model this agent sends completions to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The shared capability registry.
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// One completion round-trip: freshly synthesized system prompt plus
    /// the full conversation.
    async fn complete(&self) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.push(Message::system(build_system_prompt(&self.capabilities)));
        messages.extend(self.conversation.iter().cloned());

        self.provider
            .complete(&messages, &self.model, &self.request_config)
            .await
    }
}

/// Render a capability outcome as the synthetic user message the model
/// reads on the second round-trip.
fn render_outcome(name: &str, outcome: &Value) -> String {
    let rendered =
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| outcome.to_string());
    format!("Tool '{name}' executed. Result: {rendered}")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
