//! Shared utilities for integration tests.

pub mod harness;

use serde_json::Value;

/// Returns the `data` array of a JSON listing as a list of titles.
#[allow(dead_code)]
pub fn titles(listing: &Value) -> Vec<String> {
    listing["data"]["notes"]
        .as_array()
        .expect("listing should have a notes array")
        .iter()
        .map(|n| n["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
