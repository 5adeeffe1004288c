//! CLI configuration.
//!
//! Configuration can be loaded from:
//! - Environment variables (VITALSYNC_*)
//! - TOML configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use vitalsync_client::{ClientConfig, ReconnectConfig};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// WebSocket endpoint of the VitalSync server.
    #[serde(default = "default_url")]
    pub url: String,

    /// Delay before the first reconnect attempt in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Reconnect attempts before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Liveness probe interval in milliseconds.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_url() -> String {
    std::env::var("VITALSYNC_URL").unwrap_or_else(|_| "ws://127.0.0.1:8765/ws".to_string())
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_probe_interval_ms() -> u64 {
    30_000
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            base_delay_ms: default_base_delay_ms(),
            max_attempts: default_max_attempts(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from file or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        // Try to load from default paths
        let config_paths = [
            "vitalsync.toml",
            "/etc/vitalsync/vitalsync.toml",
            "~/.config/vitalsync/vitalsync.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        // Fall back to defaults with environment overrides
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Settings for the client library.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.connection.url.clone(),
            reconnect: ReconnectConfig {
                base_delay_ms: self.connection.base_delay_ms,
                max_attempts: self.connection.max_attempts,
            },
            probe_interval_ms: self.connection.probe_interval_ms,
        }
    }
}
