//! Capability registry — registration-order-preserving store and dispatcher.
//!
//! Constructed once at process start and read-only afterwards, so it can be
//! shared across all sessions behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use reagent_core::types::CapabilityDescriptor;

use super::base::Capability;

/// A capability name that is not registered.
#[derive(Debug, thiserror::Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores capabilities keyed by name and dispatches model requests.
///
/// Registration order is preserved — `descriptors()` renders the prompt
/// listing in the order capabilities were registered, every time.
pub struct CapabilityRegistry {
    capabilities: Vec<Arc<dyn Capability>>,
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a capability. A duplicate name replaces the previous
    /// capability in place, keeping its original position.
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        let name = capability.name().to_string();
        info!(capability = %name, "registered capability");
        match self.index.get(&name) {
            Some(&pos) => self.capabilities[pos] = capability,
            None => {
                self.index.insert(name, self.capabilities.len());
                self.capabilities.push(capability);
            }
        }
    }

    /// Check if a capability is registered.
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names of all registered capabilities, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.capabilities.iter().map(|c| c.name().to_string()).collect()
    }

    /// Descriptors for all registered capabilities, in registration order.
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        self.capabilities.iter().map(|c| c.descriptor()).collect()
    }

    /// Invoke a capability by name, passing the parameters through as-is.
    ///
    /// Fails only for an absent name. Handler outcomes — including ones
    /// with `"success": false` — pass through untouched; the registry never
    /// reinterprets them.
    pub async fn invoke(
        &self,
        name: &str,
        params: HashMap<String, Value>,
    ) -> Result<Value, UnknownCapability> {
        let capability = self
            .index
            .get(name)
            .map(|&pos| &self.capabilities[pos])
            .ok_or_else(|| UnknownCapability(name.to_string()))?;

        Ok(capability.execute(params).await)
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Minimal test capability.
    struct EchoCapability;

    #[async_trait]
    impl Capability for EchoCapability {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters(&self) -> &str {
            "text (str)"
        }
        async fn execute(&self, params: HashMap<String, Value>) -> Value {
            let text = params.get("text").and_then(|v| v.as_str()).unwrap_or("");
            json!({"success": true, "echoed": text})
        }
    }

    /// Capability whose outcome reports failure.
    struct BrokenCapability;

    #[async_trait]
    impl Capability for BrokenCapability {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always reports failure"
        }
        fn parameters(&self) -> &str {
            ""
        }
        async fn execute(&self, _params: HashMap<String, Value>) -> Value {
            json!({"success": false, "error": "intentional failure"})
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability));
        assert!(registry.has("echo"));
        assert!(!registry.has("nope"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_descriptors_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(BrokenCapability));
        registry.register(Arc::new(EchoCapability));

        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["broken", "echo"]);
    }

    #[test]
    fn test_descriptors_idempotent() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability));
        registry.register(Arc::new(BrokenCapability));

        assert_eq!(registry.descriptors(), registry.descriptors());
    }

    #[test]
    fn test_duplicate_registration_keeps_position() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability));
        registry.register(Arc::new(BrokenCapability));
        registry.register(Arc::new(EchoCapability));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo", "broken"]);
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability));

        let mut params = HashMap::new();
        params.insert("text".into(), json!("hello"));
        let outcome = registry.invoke("echo", params).await.unwrap();

        assert_eq!(outcome["success"], true);
        assert_eq!(outcome["echoed"], "hello");
    }

    #[tokio::test]
    async fn test_invoke_unknown() {
        let registry = CapabilityRegistry::new();
        let err = registry.invoke("missing", HashMap::new()).await.unwrap_err();
        assert_eq!(err.0, "missing");
    }

    #[tokio::test]
    async fn test_failure_outcome_passes_through() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(BrokenCapability));

        let outcome = registry.invoke("broken", HashMap::new()).await.unwrap();
        assert_eq!(outcome["success"], false);
        assert_eq!(outcome["error"], "intentional failure");
    }

    #[test]
    fn test_default() {
        let registry = CapabilityRegistry::default();
        assert!(registry.is_empty());
    }
}
