//! Command translation
//!
//! Maps the commands accepted by the HTTP API onto the payloads a hub expects
//! on `PUT control/{uid}`. The numeric codes are fixed by the fan hardware.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Remaining-time value that keeps a fan running until told otherwise
pub const REMAINING_INDEFINITE: u32 = 65535;

/// Remaining-time value that stops a fan
pub const REMAINING_STOP: u32 = 0;

/// Turn a fan on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerCommand {
    pub on: bool,
}

/// Set the speed a fan is currently running at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedCommand {
    pub speed: String,
}

/// Choose how many speed presets a fan cycles through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpeedsCommand {
    pub speeds: String,
}

/// Set the remaining run time directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTimeCommand {
    pub remaining: u32,
}

/// Select a speed preset sequence directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCommand {
    pub sequence: u8,
}

/// Body of a `PUT control/{uid}` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlPayload {
    Remaining(RemainingTimeCommand),
    Speed(SpeedCommand),
    Sequence(SequenceCommand),
}

impl ControlPayload {
    /// Serialize to the JSON bytes sent to the hub
    pub fn to_json(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl PowerCommand {
    /// On runs indefinitely, off stops the fan
    pub fn translate(&self) -> RemainingTimeCommand {
        let remaining = if self.on {
            REMAINING_INDEFINITE
        } else {
            REMAINING_STOP
        };
        RemainingTimeCommand { remaining }
    }
}

impl SpeedCommand {
    pub fn translate(&self) -> SpeedCommand {
        self.clone()
    }
}

impl UpdateSpeedsCommand {
    /// Map a speed count onto the hub's sequence code.
    ///
    /// Unrecognised values fall back to sequence 0 (all three speeds) instead
    /// of being rejected.
    pub fn translate(&self) -> SequenceCommand {
        let sequence = match self.speeds.as_str() {
            "3" => 0,
            "2" => 1,
            "1" => 4,
            other => {
                warn!(
                    "Unrecognised speed count {:?}, falling back to sequence 0",
                    other
                );
                0
            }
        };
        SequenceCommand { sequence }
    }
}

impl From<RemainingTimeCommand> for ControlPayload {
    fn from(cmd: RemainingTimeCommand) -> Self {
        ControlPayload::Remaining(cmd)
    }
}

impl From<SpeedCommand> for ControlPayload {
    fn from(cmd: SpeedCommand) -> Self {
        ControlPayload::Speed(cmd)
    }
}

impl From<SequenceCommand> for ControlPayload {
    fn from(cmd: SequenceCommand) -> Self {
        ControlPayload::Sequence(cmd)
    }
}
