use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the inventory service (default: "http://localhost:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds before inline messages are dismissed (default: 5)
    #[serde(default = "default_message_ttl_secs")]
    pub message_ttl_secs: u64,
    /// Per-request timeout in seconds; unset leaves it to the transport
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_message_ttl_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            message_ttl_secs: default_message_ttl_secs(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI arguments
    pub fn load(config_path: Option<&PathBuf>, cli_url: Option<&str>) -> anyhow::Result<Self> {
        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            // Try default config file
            if let Ok(content) = std::fs::read_to_string("stockdesk.toml") {
                toml::from_str(&content)?
            } else {
                Config::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());

        if let Some(url) = cli_url {
            config.base_url = url.to_string();
        }

        Ok(config)
    }

    /// Override fields from environment variables, looked up through `var`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("STOCKDESK_URL") {
            self.base_url = url;
        }
        if let Some(ttl) = var("STOCKDESK_MESSAGE_TTL_SECS") {
            if let Ok(secs) = ttl.parse() {
                self.message_ttl_secs = secs;
            }
        }
        if let Some(timeout) = var("STOCKDESK_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = Some(secs);
            }
        }
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
