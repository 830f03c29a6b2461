//! Shared relay state and settings

use std::path::PathBuf;
use std::sync::Arc;
use zola_ai::{Model, providers::LlmProvider};

/// State shared by all relay handlers
#[derive(Clone)]
pub struct RelayState {
    pub provider: Arc<dyn LlmProvider>,
    pub model: Model,
}

impl RelayState {
    pub fn new(provider: Arc<dyn LlmProvider>, model: Model) -> Self {
        Self { provider, model }
    }
}

/// Listener settings for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for unmatched paths (e.g. `background.jpg`)
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: None,
        }
    }
}

impl RelayConfig {
    /// `host:port` socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
