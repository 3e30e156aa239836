//! quietcool-hub
//!
//! Client side of the QuietCool hub protocol. Contains the CoAP codec and
//! UDP transport, the typed device gateway, and the fan aggregator that the
//! daemon calls into.
//
//! Public API:
//! - `aggregator::FanAggregator` - fan-level operations for details, listing and control
//! - `gateway::DeviceGateway` - typed, uid-checked hub resources
//! - `transport::UdpCoapClient` - CoAP-over-UDP implementation of `CoapTransport`

pub mod aggregator;
pub mod coap;
pub mod gateway;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregator::FanAggregator;
pub use coap::Method;
pub use gateway::DeviceGateway;
pub use transport::{CoapTransport, UdpCoapClient};
