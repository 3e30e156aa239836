//! Core types and data structures for the QuietCool gateway

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Anything the hub reports that names the fan it belongs to.
///
/// Used to verify that a response was produced for the fan it was requested
/// for; see [`check_uid`].
pub trait HasUid {
    /// Unique ID of the fan this value describes
    fn uid(&self) -> &str;
}

/// Fail with [`QuietcoolError::Correlation`](crate::QuietcoolError::Correlation)
/// unless `value` belongs to the fan identified by `id`.
pub fn check_uid<T: HasUid>(id: &FanIdentity, value: T) -> crate::Result<T> {
    if value.uid() == id.unique_id {
        Ok(value)
    } else {
        Err(crate::QuietcoolError::Correlation {
            requested: id.unique_id.clone(),
            returned: value.uid().to_string(),
        })
    }
}

/// Identifies one fan behind one hub
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FanIdentity {
    /// Address of the hub (IP literal, `ip:port`, or hostname)
    #[serde(rename = "ip")]
    pub hub_address: String,
    /// Hub-scoped unique ID of the fan
    #[serde(rename = "uid")]
    pub unique_id: String,
}

impl FanIdentity {
    /// Create a new fan identity
    pub fn new(hub_address: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self {
            hub_address: hub_address.into(),
            unique_id: unique_id.into(),
        }
    }
}

impl fmt::Display for FanIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hub_address, self.unique_id)
    }
}

/// One entry of the hub's `uids` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UidEntry {
    #[serde(deserialize_with = "scalar_text")]
    pub uid: String,
}

/// Descriptive attributes reported by a fan (`device/{uid}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(deserialize_with = "scalar_text")]
    pub uid: String,
    #[serde(rename = "type", deserialize_with = "scalar_text")]
    pub device_type: String,
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    /// Firmware version
    #[serde(deserialize_with = "scalar_text")]
    pub version: String,
    #[serde(deserialize_with = "scalar_text")]
    pub config: String,
    #[serde(deserialize_with = "scalar_text")]
    pub model: String,
    #[serde(deserialize_with = "scalar_text")]
    pub pincode: String,
    #[serde(deserialize_with = "scalar_text")]
    pub role: String,
    #[serde(deserialize_with = "scalar_text")]
    pub online: String,
    #[serde(deserialize_with = "scalar_text")]
    pub status: String,
    /// Hub-assigned id; fan listings are ordered by this as text
    #[serde(deserialize_with = "scalar_text")]
    pub hubid: String,
}

impl HasUid for DeviceInfo {
    fn uid(&self) -> &str {
        &self.uid
    }
}

/// Live operating state of a fan (`control/{uid}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    #[serde(deserialize_with = "scalar_text")]
    pub uid: String,
    #[serde(deserialize_with = "scalar_text")]
    pub mode: String,
    /// Active speed preset sequence code
    #[serde(deserialize_with = "scalar_text")]
    pub sequence: String,
    #[serde(deserialize_with = "scalar_text")]
    pub speed: String,
    #[serde(deserialize_with = "scalar_text")]
    pub duration: String,
    #[serde(deserialize_with = "scalar_text")]
    pub started: String,
    /// Remaining run time; 65535 means "until turned off"
    #[serde(deserialize_with = "scalar_text")]
    pub remaining: String,
    #[serde(deserialize_with = "scalar_text")]
    pub source: String,
    #[serde(deserialize_with = "scalar_text")]
    pub input_1_value: String,
}

impl HasUid for ControlStatus {
    fn uid(&self) -> &str {
        &self.uid
    }
}

/// Identity, info and status of one fan, fetched together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanDetails {
    pub id: FanIdentity,
    pub info: DeviceInfo,
    pub status: ControlStatus,
}

/// All fans of one hub, ordered by `info.hubid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanList {
    pub fans: Vec<FanDetails>,
}

impl FanList {
    /// Build a list ordered by hub id (text order, so "100" < "20" < "3")
    pub fn sorted(mut fans: Vec<FanDetails>) -> Self {
        fans.sort_by(|a, b| a.info.hubid.cmp(&b.info.hubid));
        Self { fans }
    }
}

/// Accept a JSON string or number and keep it as text; reject everything else.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarText;

    impl serde::de::Visitor<'_> for ScalarText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarText)
}
