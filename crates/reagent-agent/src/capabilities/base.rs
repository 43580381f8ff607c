//! Capability trait — the abstract interface every side-effecting
//! capability implements.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use reagent_core::types::CapabilityDescriptor;

// ─────────────────────────────────────────────
// Capability trait
// ─────────────────────────────────────────────

/// Every capability implements this trait.
///
/// The agent discovers capabilities via `name()`, renders their descriptors
/// into the system prompt, and dispatches model requests via `execute()`.
///
/// `execute` never fails at the Rust level: every outcome is a JSON object
/// carrying a `"success"` flag and either result data or an `"error"`
/// string. The model reads the whole outcome either way, so a handler
/// reports bad parameters the same way it reports a failed side effect.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Unique name the model uses to request this capability
    /// (e.g. `"run_shell"`).
    fn name(&self) -> &str;

    /// One-line summary shown to the model.
    fn description(&self) -> &str;

    /// Free-form parameter listing shown to the model
    /// (e.g. `"command (str), timeout (int, optional)"`). Not a schema;
    /// handlers validate their own inputs.
    fn parameters(&self) -> &str;

    /// Execute with the parameters exactly as the model supplied them.
    async fn execute(&self, params: HashMap<String, Value>) -> Value;

    /// Build the descriptor rendered into prompts and the `/tools` listing.
    fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param; the `Err` is a user-facing message
/// ready to embed in a failure outcome.
pub fn require_string(params: &HashMap<String, Value>, key: &str) -> Result<String, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Missing required parameter: {key}"))
}

/// Extract an optional `String` param.
pub fn string_param(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Extract an optional integer param.
pub fn int_param(params: &HashMap<String, Value>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}
