//! Configuration types for the QuietCool gateway
//!
//! The gateway keeps no fan state of its own, so configuration is limited to
//! [`StaticConfig`]: where the HTTP server listens and how hubs are reached.
//! It is loaded once at startup from a TOML file.

mod paths;
mod static_config;

pub use paths::default_config_path;
pub use static_config::{HubConfig, ServerConfig, StaticConfig};
