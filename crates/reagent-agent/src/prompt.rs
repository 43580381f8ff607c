//! System prompt construction.
//!
//! The prompt is synthesized fresh for every completion call: a rendered
//! listing of the registered capabilities plus instructions on the JSON
//! request format. It is never stored in conversation history.

use crate::capabilities::CapabilityRegistry;

/// Build the full system prompt for a completion call.
pub fn build_system_prompt(registry: &CapabilityRegistry) -> String {
    let tools_text = registry
        .descriptors()
        .iter()
        .map(|d| format!("- {}: {} (Parameters: {})", d.name, d.description, d.parameters))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI agent with reasoning capabilities and access to tools.\n\
         \n\
         Available Tools:\n\
         {tools_text}\n\
         \n\
         When you need to use a tool, respond with a JSON object in this format:\n\
         {{\n\
         \x20   \"reasoning\": \"Your reasoning about why you need to use this tool\",\n\
         \x20   \"tool\": \"tool_name\",\n\
         \x20   \"parameters\": {{\n\
         \x20       \"param1\": \"value1\",\n\
         \x20       \"param2\": \"value2\"\n\
         \x20   }}\n\
         }}\n\
         \n\
         When you want to respond normally, just provide your response as text.\n\
         \n\
         You can chain multiple tool uses by first analyzing the results and then deciding on next steps.\n\
         Always explain your reasoning before using a tool."
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
