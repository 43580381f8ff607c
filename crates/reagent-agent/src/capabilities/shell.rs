//! Shell capability — execute a command in a subprocess, bounded by a
//! timeout.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::info;

use super::base::{int_param, require_string, Capability};

/// Default command timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────
// ShellCapability
// ─────────────────────────────────────────────

/// Execute shell commands in a subprocess.
pub struct ShellCapability {
    /// Timeout applied when the request doesn't supply one.
    default_timeout: Duration,
}

impl ShellCapability {
    /// Create a new `ShellCapability` with an optional default timeout.
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self {
            default_timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

#[async_trait]
impl Capability for ShellCapability {
    fn name(&self) -> &str {
        "run_shell"
    }

    fn description(&self) -> &str {
        "Execute shell commands and return the output"
    }

    fn parameters(&self) -> &str {
        "command (str), timeout (int, optional)"
    }

    async fn execute(&self, params: HashMap<String, Value>) -> Value {
        let command = match require_string(&params, "command") {
            Ok(c) => c,
            Err(e) => {
                return json!({
                    "success": false,
                    "output": "",
                    "error": e,
                    "returncode": -1
                })
            }
        };

        let timeout = int_param(&params, "timeout")
            .filter(|&t| t > 0)
            .map(|t| Duration::from_secs(t as u64))
            .unwrap_or(self.default_timeout);

        info!(command = %command, timeout_secs = timeout.as_secs(), "executing shell command");

        let child = Command::new(if cfg!(target_os = "windows") { "cmd" } else { "sh" })
            .args(if cfg!(target_os = "windows") {
                vec!["/C", &command]
            } else {
                vec!["-c", &command]
            })
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) => {
                return json!({
                    "success": false,
                    "output": "",
                    "error": format!("Failed to spawn command: {e}"),
                    "returncode": -1
                })
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let code = output.status.code().unwrap_or(-1);
                json!({
                    "success": code == 0,
                    "output": String::from_utf8_lossy(&output.stdout),
                    "error": String::from_utf8_lossy(&output.stderr),
                    "returncode": code
                })
            }
            Ok(Err(e)) => json!({
                "success": false,
                "output": "",
                "error": format!("Command failed: {e}"),
                "returncode": -1
            }),
            Err(_) => json!({
                "success": false,
                "output": "",
                "error": format!("Command timed out after {} seconds", timeout.as_secs()),
                "returncode": -1
            }),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
