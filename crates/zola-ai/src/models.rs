//! Model definition for the upstream service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default upstream model
pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier (e.g., "gemini-2.0-flash")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Base URL for API calls
    pub base_url: String,
    /// Whether to enable the search-augmentation tool
    pub search: bool,
    /// Additional headers for API calls
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for Model {
    fn default() -> Self {
        default_model()
    }
}

impl Model {
    /// Replace the base URL (used for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable search augmentation
    pub fn with_search(mut self, search: bool) -> Self {
        self.search = search;
        self
    }
}

/// The model the relay uses unless configured otherwise.
pub fn default_model() -> Model {
    model_with_id(DEFAULT_MODEL_ID)
}

/// Build a Gemini model definition for an arbitrary id.
pub fn model_with_id(id: &str) -> Model {
    let id = id.strip_prefix("models/").unwrap_or(id);
    Model {
        id: id.to_string(),
        name: display_name(id),
        base_url: DEFAULT_BASE_URL.to_string(),
        search: true,
        headers: HashMap::new(),
    }
}

fn display_name(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
