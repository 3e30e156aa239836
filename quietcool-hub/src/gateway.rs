//! Device Gateway - typed operations against one hub
//!
//! Every call maps onto a single CoAP exchange. Responses that describe a fan
//! are checked against the fan they were requested for.

use crate::coap::Method;
use crate::transport::CoapTransport;
use quietcool_core::{
    check_uid, ControlPayload, ControlStatus, DeviceInfo, FanIdentity, HasUid, QuietcoolError,
    Result, UidEntry,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Resource listing every fan the hub knows
pub const UIDS_PATH: &str = "uids";

/// Path of a fan's descriptive attributes
pub fn device_path(id: &FanIdentity) -> String {
    format!("device/{}", id.unique_id)
}

/// Path of a fan's operating state
pub fn control_path(id: &FanIdentity) -> String {
    format!("control/{}", id.unique_id)
}

/// Typed access to the resources of a fan hub
///
/// Generic over the transport type, allowing the real UDP client
/// (`UdpCoapClient`) or stub transports for testing.
pub struct DeviceGateway<T: CoapTransport + ?Sized = dyn CoapTransport> {
    transport: Arc<T>,
}

impl<T: CoapTransport + ?Sized> Clone for DeviceGateway<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: CoapTransport + ?Sized> DeviceGateway<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetch the descriptive attributes of one fan
    pub async fn get_info(&self, id: &FanIdentity) -> Result<DeviceInfo> {
        self.fetch(id, &device_path(id), Method::Get, None).await
    }

    /// Fetch the current operating state of one fan
    pub async fn get_status(&self, id: &FanIdentity) -> Result<ControlStatus> {
        self.fetch(id, &control_path(id), Method::Get, None).await
    }

    /// Write control parameters and return the state the hub reports back
    pub async fn set_control(
        &self,
        id: &FanIdentity,
        payload: &ControlPayload,
    ) -> Result<ControlStatus> {
        let body = payload.to_json()?;
        self.fetch(id, &control_path(id), Method::Put, Some(&body))
            .await
    }

    /// Unique IDs of every fan behind the hub, in the order the hub reports them
    pub async fn list_uids(&self, hub_address: &str) -> Result<Vec<String>> {
        let body = self
            .transport
            .send(hub_address, Method::Get, UIDS_PATH, None)
            .await?;
        let entries: Vec<UidEntry> = decode(&body, UIDS_PATH)?;
        debug!("Hub {} reports {} fan(s)", hub_address, entries.len());
        Ok(entries.into_iter().map(|entry| entry.uid).collect())
    }

    /// One exchange for an identity-bearing resource
    async fn fetch<R>(
        &self,
        id: &FanIdentity,
        path: &str,
        method: Method,
        payload: Option<&[u8]>,
    ) -> Result<R>
    where
        R: DeserializeOwned + HasUid,
    {
        let body = self
            .transport
            .send(&id.hub_address, method, path, payload)
            .await?;
        let value: R = decode(&body, path)?;
        check_uid(id, value)
    }
}

fn decode<R: DeserializeOwned>(body: &[u8], path: &str) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| QuietcoolError::Decode(format!("{}: {}", path, e)))
}
