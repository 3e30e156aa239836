//! CoAP transport for hub communication
//!
//! Issues one request per call over a fresh UDP socket and resolves with the
//! response body. Bodies the hub splits with Block2 are fetched block by
//! block and reassembled before they are returned.

use crate::coap::{self, Method};
use async_trait::async_trait;
use coap_lite::{MessageClass, MessageType, Packet};
use quietcool_core::{HubConfig, QuietcoolError, Result};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Initial wait for an acknowledgement before retransmitting (RFC 7252 ACK_TIMEOUT)
pub const ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound of the random factor applied to the first ACK timeout
const ACK_RANDOM_FACTOR: f64 = 1.5;

/// Retransmissions of a confirmable request before giving up
pub const MAX_RETRANSMIT: u32 = 4;

/// Receive buffer; any UDP payload fits
const RECV_BUFFER: usize = u16::MAX as usize;

/// Trait for CoAP transport abstraction
///
/// This trait enables testing of the gateway without a real hub by allowing
/// stub implementations.
#[async_trait]
pub trait CoapTransport: Send + Sync {
    /// Send one request to `path` on the hub and return the response body
    async fn send(
        &self,
        hub_address: &str,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<Vec<u8>>;
}

/// CoAP-over-UDP client
#[derive(Debug, Clone)]
pub struct UdpCoapClient {
    default_port: u16,
    request_timeout: Duration,
    ack_timeout: Duration,
}

impl UdpCoapClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `default_port` - Port used for hub addresses without one (normally 5683)
    /// * `request_timeout` - Deadline for a whole call, retransmissions and blocks included
    pub fn new(default_port: u16, request_timeout: Duration) -> Self {
        Self {
            default_port,
            request_timeout,
            ack_timeout: ACK_TIMEOUT,
        }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.coap_port, config.request_timeout())
    }

    /// Override the base acknowledgement timeout
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }

    /// Resolve a hub address to a socket address
    async fn resolve(&self, hub_address: &str) -> Result<SocketAddr> {
        if let Ok(addr) = hub_address.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let bare = hub_address.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.default_port));
        }

        let target = if hub_address.contains(':') {
            hub_address.to_string()
        } else {
            format!("{}:{}", hub_address, self.default_port)
        };

        let mut addrs = lookup_host(target).await.map_err(|e| {
            QuietcoolError::CommunicationFailure(format!(
                "Failed to resolve hub address {}: {}",
                hub_address, e
            ))
        })?;

        addrs.next().ok_or_else(|| {
            QuietcoolError::CommunicationFailure(format!(
                "Hub address {} resolved to nothing",
                hub_address
            ))
        })
    }

    /// Issue the request and collect the whole response body, following Block2
    async fn transfer(
        &self,
        addr: SocketAddr,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        let mut next_block: Option<(u16, u8)> = None;

        loop {
            let mut request = coap::request(
                method,
                path,
                payload,
                rand::random::<u16>(),
                rand::random::<[u8; 4]>().to_vec(),
            );
            if let Some((num, size_exponent)) = next_block {
                coap::request_block2(&mut request, num, size_exponent);
            }

            let response = self.exchange(addr, &request).await?;
            check_success(&response, path)?;
            body.extend_from_slice(&response.payload);

            let Some(block) = coap::block2(&response) else {
                break;
            };

            let expected = next_block.map_or(0, |(num, _)| num);
            if block.num != expected {
                return Err(QuietcoolError::InvalidResponse(format!(
                    "Hub sent block {} of {} when block {} was requested",
                    block.num, path, expected
                )));
            }
            if !block.more {
                break;
            }

            debug!(
                "Block {} of {} received, {} bytes so far",
                block.num,
                path,
                body.len()
            );
            let num = block.num.checked_add(1).ok_or_else(|| {
                QuietcoolError::InvalidResponse(format!("Too many blocks for {}", path))
            })?;
            next_block = Some((num, block.size_exponent));
        }

        if body.is_empty() {
            return Err(QuietcoolError::InvalidResponse(format!(
                "Hub answered {} without a body",
                path
            )));
        }

        Ok(body)
    }

    /// Send `request` and wait for its response, retransmitting until acknowledged
    async fn exchange(&self, addr: SocketAddr, request: &Packet) -> Result<Packet> {
        let comm = |what: &str, e: std::io::Error| {
            QuietcoolError::CommunicationFailure(format!("{} {}: {}", what, addr, e))
        };

        let bind_addr = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| comm("Failed to open socket for", e))?;
        socket
            .connect(addr)
            .await
            .map_err(|e| comm("Failed to connect to", e))?;

        let datagram = coap::encode(request)
            .map_err(|e| QuietcoolError::InvalidInput(format!("Cannot encode request: {}", e)))?;
        let message_id = request.header.message_id;

        let factor = 1.0 + rand::random::<f64>() * (ACK_RANDOM_FACTOR - 1.0);
        let mut ack_timeout = self.ack_timeout.mul_f64(factor);
        let mut retransmissions = 0;
        let mut acknowledged = false;
        let mut buf = vec![0u8; RECV_BUFFER];

        debug!("TX {} bytes to {}", datagram.len(), addr);
        socket
            .send(&datagram)
            .await
            .map_err(|e| comm("Failed to send to", e))?;

        loop {
            let received = if acknowledged {
                Some(socket.recv(&mut buf).await)
            } else {
                timeout(ack_timeout, socket.recv(&mut buf)).await.ok()
            };

            let len = match received {
                Some(result) => result.map_err(|e| comm("Failed to receive from", e))?,
                None => {
                    if retransmissions == MAX_RETRANSMIT {
                        return Err(QuietcoolError::CommunicationFailure(format!(
                            "No acknowledgement from {} after {} retransmissions",
                            addr, MAX_RETRANSMIT
                        )));
                    }
                    retransmissions += 1;
                    ack_timeout *= 2;
                    debug!(
                        "Retransmitting message {} to {} (attempt {})",
                        message_id, addr, retransmissions
                    );
                    socket
                        .send(&datagram)
                        .await
                        .map_err(|e| comm("Failed to send to", e))?;
                    continue;
                }
            };

            let message = coap::decode(&buf[..len]).map_err(|e| {
                QuietcoolError::InvalidResponse(format!(
                    "Undecodable datagram from {}: {}",
                    addr, e
                ))
            })?;
            let message_type = message.header.get_type();
            debug!(
                "RX {:?} {} mid={} {} bytes from {}",
                message_type, message.header.code, message.header.message_id, len, addr
            );

            let same_token = message.get_token() == request.get_token();
            match message_type {
                MessageType::Reset if message.header.message_id == message_id => {
                    return Err(QuietcoolError::CommunicationFailure(format!(
                        "Hub {} reset the exchange",
                        addr
                    )));
                }
                MessageType::Acknowledgement if message.header.message_id == message_id => {
                    if message.header.code == MessageClass::Empty {
                        debug!("Request acknowledged, waiting for separate response");
                        acknowledged = true;
                    } else if same_token {
                        return Ok(message);
                    } else {
                        warn!("Ignoring acknowledgement with mismatched token from {}", addr);
                    }
                }
                MessageType::Confirmable | MessageType::NonConfirmable
                    if same_token && message.header.code != MessageClass::Empty =>
                {
                    if message_type == MessageType::Confirmable {
                        let ack = coap::encode(&coap::empty_ack(message.header.message_id))
                            .map_err(|e| {
                                QuietcoolError::InvalidInput(format!("Cannot encode ack: {}", e))
                            })?;
                        socket
                            .send(&ack)
                            .await
                            .map_err(|e| comm("Failed to acknowledge", e))?;
                    }
                    return Ok(message);
                }
                _ => debug!(
                    "Ignoring unrelated message {} from {}",
                    message.header.message_id, addr
                ),
            }
        }
    }
}

#[async_trait]
impl CoapTransport for UdpCoapClient {
    async fn send(
        &self,
        hub_address: &str,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        debug!("{} coap://{}/{}", method, hub_address, path);

        let transfer = async {
            let addr = self.resolve(hub_address).await?;
            self.transfer(addr, method, path, payload).await
        };

        timeout(self.request_timeout, transfer)
            .await
            .map_err(|_| {
                QuietcoolError::CommunicationFailure(format!(
                    "No response from {} for {} {} within {} ms",
                    hub_address,
                    method,
                    path,
                    self.request_timeout.as_millis()
                ))
            })?
    }
}

/// Reject any response whose code is not 2.xx
fn check_success(response: &Packet, path: &str) -> Result<()> {
    if coap::is_success(response.header.code) {
        Ok(())
    } else {
        Err(QuietcoolError::InvalidResponse(format!(
            "Hub answered {} for {}",
            response.header.code, path
        )))
    }
}
