//! Reply classification — decide whether an assistant reply is plain text
//! or an embedded capability request.
//!
//! The model is instructed to request a capability by replying with a JSON
//! object `{"reasoning": ..., "tool": ..., "parameters": {...}}`. Anything
//! that doesn't parse into exactly that shape — bad JSON, missing fields,
//! wrong field types — is treated as ordinary text. Classification is
//! total: it never fails.

use std::collections::HashMap;

use serde_json::Value;

/// A capability request extracted from an assistant reply.
///
/// Lives only within one `process_message` call.
#[derive(Clone, Debug, PartialEq)]
pub struct CapabilityRequest {
    /// Requested capability name (may or may not be registered).
    pub name: String,
    /// Parameters exactly as supplied — no coercion, no validation.
    pub parameters: HashMap<String, Value>,
    /// The model's stated reasoning; empty when absent.
    pub reasoning: String,
}

/// Classification of an assistant reply.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedReply {
    /// An ordinary text reply.
    PlainText(String),
    /// A well-formed capability request.
    CapabilityRequest(CapabilityRequest),
}

/// Classify an assistant reply.
///
/// The fast path rejects anything whose first non-whitespace character is
/// not `{` without attempting a parse.
pub fn classify(reply: &str) -> ParsedReply {
    if !reply.trim_start().starts_with('{') {
        return ParsedReply::PlainText(reply.to_string());
    }

    let parsed: Value = match serde_json::from_str(reply) {
        Ok(v) => v,
        Err(_) => return ParsedReply::PlainText(reply.to_string()),
    };

    let name = match parsed.get("tool").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return ParsedReply::PlainText(reply.to_string()),
    };

    let parameters = match parsed.get("parameters").and_then(|v| v.as_object()) {
        Some(obj) => obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        None => return ParsedReply::PlainText(reply.to_string()),
    };

    let reasoning = parsed
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    ParsedReply::CapabilityRequest(CapabilityRequest {
        name,
        parameters,
        reasoning,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text() {
        let reply = "Hi there! How can I help?";
        assert_eq!(classify(reply), ParsedReply::PlainText(reply.to_string()));
    }

    #[test]
    fn test_valid_request() {
        let reply = r#"{"reasoning": "need to check", "tool": "run_shell", "parameters": {"command": "ls"}}"#;

        match classify(reply) {
            ParsedReply::CapabilityRequest(req) => {
                assert_eq!(req.name, "run_shell");
                assert_eq!(req.reasoning, "need to check");
                assert_eq!(req.parameters.get("command"), Some(&json!("ls")));
            }
            other => panic!("Expected CapabilityRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_leading_whitespace_still_parses() {
        let reply = "  \n {\"tool\": \"run_shell\", \"parameters\": {}}";
        assert!(matches!(classify(reply), ParsedReply::CapabilityRequest(_)));
    }

    #[test]
    fn test_invalid_json_is_plain_text() {
        let reply = "{ this is not json";
        assert_eq!(classify(reply), ParsedReply::PlainText(reply.to_string()));
    }

    #[test]
    fn test_missing_tool_is_plain_text() {
        let reply = r#"{"parameters": {"command": "ls"}}"#;
        assert!(matches!(classify(reply), ParsedReply::PlainText(_)));
    }

    #[test]
    fn test_missing_parameters_is_plain_text() {
        let reply = r#"{"tool": "run_shell"}"#;
        assert!(matches!(classify(reply), ParsedReply::PlainText(_)));
    }

    #[test]
    fn test_non_object_parameters_is_plain_text() {
        let reply = r#"{"tool": "run_shell", "parameters": "ls"}"#;
        assert!(matches!(classify(reply), ParsedReply::PlainText(_)));
    }

    #[test]
    fn test_non_string_tool_is_plain_text() {
        let reply = r#"{"tool": 7, "parameters": {}}"#;
        assert!(matches!(classify(reply), ParsedReply::PlainText(_)));
    }

    #[test]
    fn test_reasoning_defaults_to_empty() {
        let reply = r#"{"tool": "run_shell", "parameters": {"command": "ls"}}"#;

        match classify(reply) {
            ParsedReply::CapabilityRequest(req) => assert_eq!(req.reasoning, ""),
            other => panic!("Expected CapabilityRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_json_mentioning_tools_in_prose_is_plain_text() {
        // Doesn't start with '{' — no parse attempted
        let reply = r#"Here's the call: {"tool": "run_shell", "parameters": {}}"#;
        assert!(matches!(classify(reply), ParsedReply::PlainText(_)));
    }
}
