//! Capability modules for the reagent agent.

pub mod base;
pub mod file;
pub mod registry;
pub mod search;
pub mod shell;

pub use base::{require_string, string_param, int_param, Capability};
pub use registry::{CapabilityRegistry, UnknownCapability};

use std::sync::Arc;

/// Build a registry with the three built-in capabilities, in the order they
/// are rendered into the system prompt.
pub fn builtin_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register(Arc::new(shell::ShellCapability::new(None)));
    registry.register(Arc::new(search::WebSearchCapability::new()));
    registry.register(Arc::new(file::WriteFileCapability::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = builtin_registry();
        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["run_shell", "run_web_search", "write_to_file"]);
    }
}
