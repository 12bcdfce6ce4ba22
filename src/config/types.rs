use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Connection settings for the admin REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (e.g., "http://localhost:4000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per page when a list screen mounts. One of 5, 10, 15.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Event loop tick in milliseconds (default: 250).
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// How long a notice stays on screen (default: 4).
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl_seconds: u64,
}

/// Where the signed-in session is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Override for the session file. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_page_size() -> u32 {
    10
}

fn default_tick_rate() -> u64 {
    250
}

fn default_notice_ttl() -> u64 {
    4
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            tick_rate_ms: default_tick_rate(),
            notice_ttl_seconds: default_notice_ttl(),
        }
    }
}
