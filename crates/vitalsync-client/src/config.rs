//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_probe_interval_ms() -> u64 {
    30_000
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_max_attempts() -> u32 {
    5
}

/// Settings for the realtime client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8765/ws`.
    pub url: String,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Interval between liveness probes while connected.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

impl ClientConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectConfig::default(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }

    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

/// Reconnect schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt; later attempts double it.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Reconnect attempts before the client gives up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconnectConfig {
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}
