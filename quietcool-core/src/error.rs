//! Error types for the QuietCool gateway

use thiserror::Error;

/// Core error type for QuietCool operations
///
/// The hub-facing variants are kept distinct so callers can tell a hub that
/// never answered apart from one that answered with garbage or answered for
/// the wrong fan, even though the HTTP surface reports them all the same way.
#[derive(Error, Debug)]
pub enum QuietcoolError {
    /// The hub could not be reached, the exchange timed out, or the socket failed
    #[error("Failed to communicate with the fan hub: {0}")]
    CommunicationFailure(String),

    /// The hub answered, but with an error code, no body, or an unreadable datagram
    #[error("Invalid response from the fan hub: {0}")]
    InvalidResponse(String),

    /// The response body did not match the expected shape
    #[error("Failed to decode hub response: {0}")]
    Decode(String),

    /// The hub returned data for a different fan than the one requested
    #[error("Hub returned data for the wrong device: requested {requested}, got {returned}")]
    Correlation { requested: String, returned: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl QuietcoolError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            QuietcoolError::CommunicationFailure(_) => "communication_failure",
            QuietcoolError::InvalidResponse(_) => "invalid_response",
            QuietcoolError::Decode(_) => "decode_error",
            QuietcoolError::Correlation { .. } => "correlation_error",
            QuietcoolError::Config(_) => "config_error",
            QuietcoolError::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type alias for QuietCool operations
pub type Result<T> = std::result::Result<T, QuietcoolError>;

impl From<serde_json::Error> for QuietcoolError {
    fn from(err: serde_json::Error) -> Self {
        QuietcoolError::Decode(err.to_string())
    }
}
