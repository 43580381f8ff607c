//! Configuration — typed schema plus JSON-file + env-var loader.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{AgentConfig, Config, ProviderSettings, ServerConfig};

/// Errors that make a configuration unusable.
///
/// Raised at construction time only — a running turn never sees these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key in the config file and no `OPENROUTER_API_KEY` env var.
    #[error("no API key configured — set OPENROUTER_API_KEY or providers.apiKey in config.json")]
    MissingApiKey,
}
