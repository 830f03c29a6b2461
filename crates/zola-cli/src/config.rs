//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zola_client::{SessionConfig, session::DEFAULT_HISTORY_LIMIT, transport::DEFAULT_RELAY_URL};

/// Configuration for zola
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API key (alternative to GEMINI_API_KEY / GOOGLE_API_KEY)
    pub api_key: Option<String>,
    pub relay: RelaySettings,
    pub client: ClientSettings,
}

/// `[relay]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Upstream model id
    pub model: Option<String>,
    /// Override for the upstream API base URL
    pub base_url: Option<String>,
    /// Directory of static assets served next to the endpoint
    pub static_dir: Option<PathBuf>,
}

/// `[client]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub relay_url: Option<String>,
    /// Prior messages sent as history; 0 sends the whole conversation
    pub history_limit: Option<usize>,
    /// How long upload notifications stay visible
    pub notification_ms: Option<u64>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zola")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("ZOLA_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Write the example config if nothing exists at `path`
    pub fn init_at(path: &Path) -> std::io::Result<PathBuf> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, example_config())?;
        Ok(path.to_path_buf())
    }

    /// Create the default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        Self::init_at(&Self::config_path())
    }

    pub fn relay_url(&self) -> String {
        self.client
            .relay_url
            .clone()
            .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string())
    }

    pub fn session_config(&self) -> SessionConfig {
        let history_limit = match self.client.history_limit {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_HISTORY_LIMIT),
        };
        SessionConfig { history_limit }
    }

    pub fn notification_window(&self) -> Duration {
        self.client
            .notification_ms
            .map(Duration::from_millis)
            .unwrap_or(zola_client::notification::DEFAULT_NOTIFICATION_WINDOW)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# zola configuration file
# Place at ~/.config/zola/config.toml (Linux) or set ZOLA_CONFIG_PATH

# Gemini API key (optional - GEMINI_API_KEY or GOOGLE_API_KEY also work)
# api_key = "..."

[relay]
host = "127.0.0.1"
port = 3000
model = "gemini-2.0-flash"
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# static_dir = "public"

[client]
relay_url = "http://127.0.0.1:3000/api/gemini"
# Prior messages sent with each prompt (0 = whole conversation)
history_limit = 40
# How long upload notifications stay visible
notification_ms = 2000
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.relay.port, Some(3000));
        assert_eq!(config.relay.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(config.client.history_limit, Some(40));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.relay_url(), DEFAULT_RELAY_URL);
        assert_eq!(
            config.notification_window(),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[relay\nport = \"x\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str("[client]\nnotification_ms = 500\n").unwrap();
        assert_eq!(config.notification_window(), Duration::from_millis(500));
        assert!(config.relay.host.is_none());
    }

    #[test]
    fn test_history_limit_zero_is_unbounded() {
        let mut config = Config::default();
        assert_eq!(
            config.session_config().history_limit,
            Some(DEFAULT_HISTORY_LIMIT)
        );
        config.client.history_limit = Some(0);
        assert_eq!(config.session_config().history_limit, None);
        config.client.history_limit = Some(6);
        assert_eq!(config.session_config().history_limit, Some(6));
    }

    #[test]
    fn test_init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zola").join("config.toml");
        Config::init_at(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), example_config());

        fs::write(&path, "api_key = \"k\"\n").unwrap();
        Config::init_at(&path).unwrap();
        assert_eq!(Config::load_from(&path).api_key.as_deref(), Some("k"));
    }
}
