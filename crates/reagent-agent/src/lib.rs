//! reagent agent — the conversation core and its capabilities.
//!
//! This crate contains:
//! - **capabilities**: Capability trait, registry, and the three built-ins
//!   (shell execution, web search, file write)
//! - **classify**: plain-text vs embedded-capability-request classification
//!   of assistant replies
//! - **prompt**: system prompt construction from the capability listing
//! - **agent**: the per-session conversation agent

pub mod agent;
pub mod capabilities;
pub mod classify;
pub mod prompt;

pub use agent::Agent;
pub use capabilities::{builtin_registry, Capability, CapabilityRegistry, UnknownCapability};
pub use classify::{CapabilityRequest, ParsedReply};
