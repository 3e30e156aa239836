//! CoAP messages for hub exchanges
//!
//! Thin helpers over [`coap_lite::Packet`]: building confirmable requests
//! and their acknowledgements, reading the bits of a response the transport
//! cares about, and encoding within the size a UDP datagram can carry.

use coap_lite::block_handler::BlockValue;
use coap_lite::error::MessageError;
use coap_lite::{
    CoapOption, ContentFormat, MessageClass, MessageType, Packet, RequestType, ResponseType,
};

/// Largest payload a single UDP datagram can carry over IPv4
pub const MAX_DATAGRAM: usize = 65_507;

const VERSION: u8 = 1;

/// Request methods the gateway issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn code(self) -> MessageClass {
        match self {
            Method::Get => MessageClass::Request(RequestType::Get),
            Method::Put => MessageClass::Request(RequestType::Put),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Put => f.write_str("PUT"),
        }
    }
}

/// Confirmable request for `path`, JSON content format when a payload is given
pub fn request(
    method: Method,
    path: &str,
    payload: Option<&[u8]>,
    message_id: u16,
    token: Vec<u8>,
) -> Packet {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Confirmable);
    packet.header.code = method.code();
    packet.header.message_id = message_id;
    packet.set_token(token);

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        packet.add_option(CoapOption::UriPath, segment.as_bytes().to_vec());
    }

    if let Some(payload) = payload {
        packet.set_content_format(ContentFormat::ApplicationJSON);
        packet.payload = payload.to_vec();
    }

    packet
}

/// Piggybacked response to a confirmable request
pub fn response(request: &Packet, code: ResponseType, payload: &[u8]) -> Packet {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Acknowledgement);
    packet.header.code = MessageClass::Response(code);
    packet.header.message_id = request.header.message_id;
    packet.set_token(request.get_token().to_vec());

    if !payload.is_empty() {
        packet.set_content_format(ContentFormat::ApplicationJSON);
        packet.payload = payload.to_vec();
    }

    packet
}

/// Empty acknowledgement of message `message_id`
pub fn empty_ack(message_id: u16) -> Packet {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Acknowledgement);
    packet.header.code = MessageClass::Empty;
    packet.header.message_id = message_id;
    packet
}

/// `Uri-Path` segments joined with `/`
pub fn uri_path(packet: &Packet) -> String {
    packet
        .get_option(CoapOption::UriPath)
        .map(|segments| {
            segments
                .iter()
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

/// 2.xx response codes
pub fn is_success(code: MessageClass) -> bool {
    matches!(code, MessageClass::Response(_)) && u8::from(code) >> 5 == 2
}

/// The Block2 option of a response, if it carries one
pub fn block2(packet: &Packet) -> Option<BlockValue> {
    packet
        .get_first_option_as::<BlockValue>(CoapOption::Block2)
        .and_then(|value| value.ok())
}

/// Ask for block `num` of a body split into blocks of `2^(size_exponent + 4)` bytes
pub fn request_block2(packet: &mut Packet, num: u16, size_exponent: u8) {
    packet.clear_option(CoapOption::Block2);
    packet.add_option_as(
        CoapOption::Block2,
        BlockValue {
            num,
            more: false,
            size_exponent,
        },
    );
}

pub fn encode(packet: &Packet) -> Result<Vec<u8>, MessageError> {
    packet.to_bytes_with_limit(MAX_DATAGRAM)
}

pub fn decode(bytes: &[u8]) -> Result<Packet, MessageError> {
    let packet = Packet::from_bytes(bytes)?;
    if packet.header.get_version() != VERSION {
        return Err(MessageError::InvalidHeader);
    }
    Ok(packet)
}
