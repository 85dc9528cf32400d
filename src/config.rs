//! Configuration management
//!
//! Settings come from built-in defaults, then the first config file found,
//! then `SUDAWIFI__SECTION__KEY` environment variables. Every default matches
//! the fixed SUDA_WiFi gateway, so no file is needed in practice.

use crate::http::HttpSettings;
use crate::i18n::Language;
use crate::parser::DEFAULT_PORTAL_MARKER;
use crate::session::PollPolicy;
use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Gateway endpoints and transport settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Poll loop settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Background version check
    #[serde(default)]
    pub update: UpdateConfig,

    #[serde(default)]
    pub ui: UiConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Status page, also sent as Referer on login
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Base of the eportal action endpoints
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Text that identifies the login page
    #[serde(default = "default_portal_markers")]
    pub portal_markers: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            portal_url: default_portal_url(),
            portal_markers: default_portal_markers(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl GatewayConfig {
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Delay between status polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for the gateway to converge, in seconds
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            deadline: default_deadline(),
        }
    }
}

impl SessionConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            deadline: Duration::from_secs(self.deadline),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpdateConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Static file listing the latest version per build
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,

    /// Line prefix in the manifest for this build
    #[serde(default = "default_manifest_key")]
    pub manifest_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_update_timeout")]
    pub timeout: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest_url: default_manifest_url(),
            manifest_key: default_manifest_key(),
            timeout: default_update_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_status_url() -> String {
    "http://10.9.1.3/".to_string()
}

fn default_portal_url() -> String {
    "http://10.9.1.3:801/eportal/".to_string()
}

fn default_portal_markers() -> Vec<String> {
    vec![DEFAULT_PORTAL_MARKER.to_string()]
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_poll_interval_ms() -> u64 {
    300
}

fn default_deadline() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_manifest_url() -> String {
    "https://raw.githubusercontent.com/MichaelQian0517/SUDA_WiFi/refs/heads/main/.version_check"
        .to_string()
}

fn default_manifest_key() -> String {
    "sudawifilinuxpython".to_string()
}

fn default_update_timeout() -> u64 {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration, preferring an explicit path over the search list
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        match explicit {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
            None => match search_paths().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!("Loading config from: {}", path.display());
                    builder = builder.add_source(File::from(path));
                }
                None => tracing::debug!("No config file found, using defaults"),
            },
        }

        let config = builder
            .add_source(
                Environment::with_prefix("SUDAWIFI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("config.toml"),
        PathBuf::from("/etc/sudawifi/config.toml"),
    ];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/sudawifi/config.toml"));
    }
    paths
}
