//! QuietCool Core Library
//!
//! Shared types, command translation, and configuration for the QuietCool
//! fan gateway. Used by the hub client and the HTTP daemon.

pub mod command;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use command::{
    ControlPayload, PowerCommand, RemainingTimeCommand, SequenceCommand, SpeedCommand,
    UpdateSpeedsCommand,
};
pub use config::{default_config_path, HubConfig, ServerConfig, StaticConfig};
pub use error::*;
pub use types::*;
