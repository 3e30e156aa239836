//! Static configuration loaded once at startup
//!
//! This configuration is read-only after the daemon starts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub bind: String,
    /// HTTP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// How fan hubs are reached over CoAP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// UDP port used when a hub address carries no port of its own
    pub coap_port: u16,
    /// Deadline for a single CoAP exchange, retransmissions included
    pub request_timeout_ms: u64,
}

impl HubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            coap_port: 5683,
            request_timeout_ms: 5000,
        }
    }
}

/// Static configuration for the QuietCool daemon.
///
/// Located at `~/.config/quietcool/config.toml` by default. Every section and
/// field is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// HTTP server configuration (bind address, port)
    pub server: ServerConfig,

    /// Hub communication configuration (CoAP port, timeout)
    pub hub: HubConfig,
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the gateway cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.hub.request_timeout_ms == 0 {
            return Err(crate::QuietcoolError::Config(
                "hub.request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.hub.coap_port == 0 {
            return Err(crate::QuietcoolError::Config(
                "hub.coap_port must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
