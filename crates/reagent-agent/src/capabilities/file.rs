//! File write capability — create or append to a file on disk.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::base::{require_string, string_param, Capability};

// ─────────────────────────────────────────────
// WriteFileCapability
// ─────────────────────────────────────────────

/// Writes content to a file, creating parent directories as needed.
pub struct WriteFileCapability;

impl WriteFileCapability {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WriteFileCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for WriteFileCapability {
    fn name(&self) -> &str {
        "write_to_file"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    fn parameters(&self) -> &str {
        "filepath (str), content (str), mode (str, optional: 'w' or 'a')"
    }

    async fn execute(&self, params: HashMap<String, Value>) -> Value {
        let filepath = match require_string(&params, "filepath") {
            Ok(p) => p,
            Err(e) => return json!({"success": false, "filepath": "", "mode": "w", "error": e}),
        };
        let mode = string_param(&params, "mode").unwrap_or_else(|| "w".to_string());
        let content = match require_string(&params, "content") {
            Ok(c) => c,
            Err(e) => {
                return json!({"success": false, "filepath": filepath, "mode": mode, "error": e})
            }
        };

        if mode != "w" && mode != "a" {
            return json!({
                "success": false,
                "filepath": filepath,
                "mode": mode,
                "error": format!("Unsupported mode '{mode}' (use 'w' or 'a')")
            });
        }

        match write_content(Path::new(&filepath), &content, &mode) {
            Ok(file_size) => {
                info!(filepath = %filepath, mode = %mode, bytes = content.len(), "wrote file");
                json!({
                    "success": true,
                    "filepath": filepath,
                    "mode": mode,
                    "bytes_written": content.len(),
                    "file_size": file_size
                })
            }
            Err(e) => json!({
                "success": false,
                "filepath": filepath,
                "mode": mode,
                "error": e.to_string()
            }),
        }
    }
}

/// Write or append `content`, creating parent directories first.
/// Returns the resulting file size in bytes.
fn write_content(path: &Path, content: &str, mode: &str) -> std::io::Result<u64> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    if mode == "a" {
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
    } else {
        std::fs::write(path, content)?;
    }

    Ok(std::fs::metadata(path)?.len())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
