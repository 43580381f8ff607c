//! Web search capability — DuckDuckGo Instant Answer API lookup.
//!
//! No API key required. The abstract (when present) and related topics are
//! mapped to a bounded list of `{title, snippet, url}` hits.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::base::{int_param, require_string, Capability};

/// Instant Answer API endpoint.
const DEFAULT_API_BASE: &str = "https://api.duckduckgo.com/";

/// Default number of results.
const DEFAULT_NUM_RESULTS: usize = 5;

// ─────────────────────────────────────────────
// WebSearchCapability
// ─────────────────────────────────────────────

/// Searches the web via the DuckDuckGo Instant Answer API.
pub struct WebSearchCapability {
    client: Client,
    api_base: String,
}

impl WebSearchCapability {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for WebSearchCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for WebSearchCapability {
    fn name(&self) -> &str {
        "run_web_search"
    }

    fn description(&self) -> &str {
        "Search the web and return relevant results"
    }

    fn parameters(&self) -> &str {
        "query (str), num_results (int, optional)"
    }

    async fn execute(&self, params: HashMap<String, Value>) -> Value {
        let query = match require_string(&params, "query") {
            Ok(q) => q,
            Err(e) => {
                return json!({
                    "success": false,
                    "query": "",
                    "results": [],
                    "count": 0,
                    "error": e
                })
            }
        };

        let num_results = int_param(&params, "num_results")
            .filter(|&n| n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_NUM_RESULTS);

        debug!(query = %query, num_results = num_results, "searching web");

        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return search_failure(&query, format!("Search request failed: {e}")),
        };

        if !response.status().is_success() {
            return search_failure(&query, format!("Search API returned {}", response.status()));
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => return search_failure(&query, format!("Failed to parse search response: {e}")),
        };

        map_search_response(&query, &body, num_results)
    }
}

/// Build a failure outcome with the standard search shape.
fn search_failure(query: &str, error: String) -> Value {
    json!({
        "success": false,
        "query": query,
        "results": [],
        "count": 0,
        "error": error
    })
}

/// Map an Instant Answer payload to the bounded `{title, snippet, url}` list.
fn map_search_response(query: &str, body: &Value, num_results: usize) -> Value {
    let mut results: Vec<Value> = Vec::new();

    // Abstract, when present, leads the list
    if let Some(abstract_text) = body["Abstract"].as_str().filter(|s| !s.is_empty()) {
        results.push(json!({
            "title": body["Heading"].as_str().unwrap_or(""),
            "snippet": abstract_text,
            "url": body["AbstractURL"].as_str().unwrap_or("")
        }));
    }

    // Related topics fill the rest
    for topic in body["RelatedTopics"]
        .as_array()
        .map(|a| a.as_slice())
        .unwrap_or(&[])
        .iter()
        .take(num_results)
    {
        let text = match topic["Text"].as_str() {
            Some(t) => t,
            None => continue,
        };
        let title = match text.split_once(" - ") {
            Some((head, _)) => head,
            None => "",
        };
        results.push(json!({
            "title": title,
            "snippet": text,
            "url": topic["FirstURL"].as_str().unwrap_or("")
        }));
    }

    results.truncate(num_results);
    let count = results.len();

    json!({
        "success": true,
        "query": query,
        "results": results,
        "count": count
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
