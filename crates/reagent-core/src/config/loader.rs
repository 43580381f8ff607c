//! Config loader — reads `~/.reagent/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.reagent/config.json`
//! 3. Environment variables (override JSON):
//!    - `OPENROUTER_API_KEY` → `provider.api_key`
//!    - `REAGENT_API_BASE`   → `provider.api_base`
//!    - `REAGENT_MODEL`      → `agent.model`
//!    - `PORT`               → `server.port`

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
        if !key.is_empty() {
            config.provider.api_key = key;
        }
    }
    if let Ok(base) = std::env::var("REAGENT_API_BASE") {
        if !base.is_empty() {
            config.provider.api_base = Some(base);
        }
    }
    if let Ok(model) = std::env::var("REAGENT_MODEL") {
        if !model.is_empty() {
            config.agent.model = model;
        }
    }
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!("Ignoring invalid PORT value: {}", port),
        }
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Clear the env vars the loader reads so ambient CI values can't leak
    /// into assertions.
    fn clear_env() {
        std::env::remove_var("REAGENT_MODEL");
        std::env::remove_var("REAGENT_API_BASE");
        std::env::remove_var("PORT");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.json")));
        assert_eq!(config.agent.model, "openai/gpt-3.5-turbo");
    }

    #[test]
    fn test_load_valid_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"agent": {"model": "deepseek/deepseek-chat"}, "server": {"port": 9000}}"#,
        )
        .unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.agent.model, "deepseek/deepseek-chat");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_invalid_json_degrades_to_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_save_and_reload() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.agent.model = "openrouter/auto".into();
        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config(Some(&path));
        assert_eq!(reloaded.agent.model, "openrouter/auto");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/config.json");

        save_config(&Config::default(), Some(&path)).unwrap();
        assert!(path.exists());
    }
}
