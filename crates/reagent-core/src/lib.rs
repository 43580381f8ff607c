//! reagent core — shared types, configuration, and utilities.
//!
//! This crate contains:
//! - **types**: conversation messages, chat-completion wire types,
//!   capability descriptors, and the per-turn result
//! - **config**: typed configuration schema and JSON + env loader
//! - **utils**: path and string helpers

pub mod config;
pub mod types;
pub mod utils;

pub use config::{load_config, Config, ConfigError};
pub use types::{CapabilityDescriptor, Message, TurnResult};
