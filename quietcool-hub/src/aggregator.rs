//! Fan Aggregator - fan-level operations composed from gateway calls
//!
//! Independent exchanges run concurrently. The first failure fails the whole
//! operation and drops the exchanges still in flight.

use crate::gateway::DeviceGateway;
use crate::transport::CoapTransport;
use futures::future::try_join_all;
use quietcool_core::{
    ControlPayload, ControlStatus, FanDetails, FanIdentity, FanList, PowerCommand,
    RemainingTimeCommand, Result, SequenceCommand, SpeedCommand, UpdateSpeedsCommand,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct FanAggregator<T: CoapTransport + ?Sized = dyn CoapTransport> {
    gateway: DeviceGateway<T>,
}

impl<T: CoapTransport + ?Sized> Clone for FanAggregator<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<T: CoapTransport + ?Sized> FanAggregator<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            gateway: DeviceGateway::new(transport),
        }
    }

    pub fn gateway(&self) -> &DeviceGateway<T> {
        &self.gateway
    }

    /// Info and status of one fan, fetched concurrently
    pub async fn get_fan_details(&self, id: &FanIdentity) -> Result<FanDetails> {
        let (info, status) =
            tokio::try_join!(self.gateway.get_info(id), self.gateway.get_status(id))?;

        Ok(FanDetails {
            id: id.clone(),
            info,
            status,
        })
    }

    /// Details of every fan behind a hub, ordered by hub id.
    ///
    /// Fails as a whole if any single fan fails; a partial list is never returned.
    pub async fn list_fans(&self, hub_address: &str) -> Result<FanList> {
        let ids: Vec<FanIdentity> = self
            .gateway
            .list_uids(hub_address)
            .await?
            .into_iter()
            .map(|uid| FanIdentity::new(hub_address, uid))
            .collect();

        debug!("Fetching details for {} fan(s) on {}", ids.len(), hub_address);

        let fans = try_join_all(ids.iter().map(|id| self.get_fan_details(id))).await?;
        Ok(FanList::sorted(fans))
    }

    pub async fn set_power(
        &self,
        id: &FanIdentity,
        command: PowerCommand,
    ) -> Result<ControlStatus> {
        info!("Setting {} power to {}", id.unique_id, command.on);
        self.set(id, command.translate().into()).await
    }

    pub async fn set_current_speed(
        &self,
        id: &FanIdentity,
        command: SpeedCommand,
    ) -> Result<ControlStatus> {
        info!("Setting {} current speed to {}", id.unique_id, command.speed);
        self.set(id, command.translate().into()).await
    }

    pub async fn update_speeds(
        &self,
        id: &FanIdentity,
        command: UpdateSpeedsCommand,
    ) -> Result<ControlStatus> {
        info!("Setting {} fan speeds to {}", id.unique_id, command.speeds);
        self.set(id, command.translate().into()).await
    }

    pub async fn set_remaining(
        &self,
        id: &FanIdentity,
        command: RemainingTimeCommand,
    ) -> Result<ControlStatus> {
        info!("Setting {} remaining time to {}", id.unique_id, command.remaining);
        self.set(id, command.into()).await
    }

    pub async fn set_sequence(
        &self,
        id: &FanIdentity,
        command: SequenceCommand,
    ) -> Result<ControlStatus> {
        info!("Setting {} sequence to {}", id.unique_id, command.sequence);
        self.set(id, command.into()).await
    }

    async fn set(&self, id: &FanIdentity, payload: ControlPayload) -> Result<ControlStatus> {
        self.gateway.set_control(id, &payload).await
    }
}
