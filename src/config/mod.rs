//! Configuration management for the bridge
//!
//! This module holds the settings the adaptor applies when building driver
//! client options. URI parsing itself belongs to the driver; the embedding
//! shell owns config file loading and command-line handling, so the bridge
//! only consumes an already-populated [`Config`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Issue writes with an unacknowledged write concern, matching the
    /// legacy shell's fire-and-forget write behavior
    #[serde(default = "default_shell_write_concern")]
    pub use_shell_write_concern: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_app_name() -> String {
    "mongobridge".to_string()
}

fn default_shell_write_concern() -> bool {
    false
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            app_name: default_app_name(),
            use_shell_write_concern: default_shell_write_concern(),
        }
    }
}

impl ConnectionConfig {
    /// Connection timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
