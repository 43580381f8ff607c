//! Core types for reagent — conversation messages, completion wire types,
//! capability descriptors, and the per-turn result.
//!
//! Messages follow the OpenAI chat-completions format. The assistant never
//! sends native tool calls in this system — capability requests arrive
//! embedded as JSON in ordinary assistant text — so `Message` only needs
//! the three conversational roles.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format.
///
/// Each variant maps to a `role` field value. The system prompt is
/// synthesized fresh for every completion call and never stored in a
/// conversation, but it still travels on the wire as a `system` message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "assistant")]
    Assistant { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
        }
    }

    /// The role string as it appears on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
        }
    }

    /// The text content of the message.
    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// Capability descriptors
// ─────────────────────────────────────────────

/// Human-readable description of a registered capability, rendered into the
/// system prompt and returned by the `/tools` endpoint.
///
/// `parameters` is a free-form listing (e.g. `"command (str), timeout (int,
/// optional)"`), not a machine-validated schema — handlers validate their
/// own inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CapabilityDescriptor {
    /// Unique name the model uses to request this capability.
    pub name: String,
    /// One-line summary shown to the model.
    pub description: String,
    /// Free-form parameter listing.
    pub parameters: String,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Self {
        CapabilityDescriptor {
            name: name.into(),
            description: description.into(),
            parameters: parameters.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Turn result
// ─────────────────────────────────────────────

/// The outcome of one `process_message` call, returned to the caller.
///
/// `tool_used` and `tool_result` always appear in the JSON (as `null` when
/// no capability ran); `tool_reasoning` and `error` are omitted entirely
/// when absent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TurnResult {
    /// Final text for the user — the model's reply, or the follow-up reply
    /// after a capability ran.
    pub response: String,
    /// Name of the capability invoked this turn, if any.
    pub tool_used: Option<String>,
    /// The model's stated reasoning for the capability request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_reasoning: Option<String>,
    /// The capability's structured outcome (carries its own success flag).
    pub tool_result: Option<Value>,
    /// Set only when a completion call failed at the transport/protocol
    /// level; `response` then holds a generic failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TurnResult {
    /// A plain reply with no capability involvement.
    pub fn plain(response: impl Into<String>) -> Self {
        TurnResult {
            response: response.into(),
            tool_used: None,
            tool_reasoning: None,
            tool_result: None,
            error: None,
        }
    }

    /// A failed turn: generic response text plus the error detail.
    pub fn failed(response: impl Into<String>, error: impl Into<String>) -> Self {
        TurnResult {
            response: response.into(),
            tool_used: None,
            tool_reasoning: None,
            tool_result: None,
            error: Some(error.into()),
        }
    }
}

// ─────────────────────────────────────────────
// Chat completion wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ReplyMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

/// Token usage statistics from the completion API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
