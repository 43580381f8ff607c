//! Completion provider layer for reagent.
//!
//! # Architecture
//!
//! - [`traits::CompletionProvider`] — trait the agent calls through
//! - [`error::ProviderError`] — transport/protocol failure taxonomy
//! - [`openrouter::OpenRouterProvider`] — reqwest client for any
//!   OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default)

pub mod error;
pub mod openrouter;
pub mod traits;

pub use error::ProviderError;
pub use openrouter::OpenRouterProvider;
pub use traits::{CompletionConfig, CompletionProvider};
