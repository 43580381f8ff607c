//! reagent CLI — entry point.
//!
//! # Commands
//!
//! - `reagent serve` — run the HTTP gateway (per-session agents)
//! - `reagent chat [-m MESSAGE]` — local chat (single-shot or REPL)
//! - `reagent tools` — list the registered capabilities

mod helpers;
mod repl;
mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reagent_agent::{builtin_registry, Agent};
use reagent_core::config::{load_config, Config};
use reagent_providers::{CompletionConfig, OpenRouterProvider};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// reagent — a tool-using conversational agent over OpenRouter
#[derive(Parser)]
#[command(name = "reagent", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Chat with the agent locally (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List the registered capabilities
    Tools,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_tracing(logs);

            let mut config = load_config(None);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            server::run(config).await
        }

        Commands::Chat { message, logs } => {
            init_tracing(logs);

            let config = load_config(None);
            let mut agent = build_agent(&config)?;

            match message {
                Some(text) => {
                    let result = agent.process_message(&text).await;
                    helpers::print_turn(&result);
                    Ok(())
                }
                None => repl::run(agent).await,
            }
        }

        Commands::Tools => {
            let registry = builtin_registry();
            for descriptor in registry.descriptors() {
                println!("{}", descriptor.name);
                println!("  {}", descriptor.description);
                println!("  Parameters: {}", descriptor.parameters);
                println!();
            }
            Ok(())
        }
    }
}

/// Build a single local agent from config.
fn build_agent(config: &Config) -> Result<Agent> {
    let provider = OpenRouterProvider::new(&config.provider, &config.agent.model)?;
    let request_config = CompletionConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
    };

    Ok(Agent::new(
        Arc::new(provider),
        Arc::new(builtin_registry()),
        Some(config.agent.model.clone()),
        Some(request_config),
    ))
}

/// Initialize tracing; `RUST_LOG` wins when set.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
