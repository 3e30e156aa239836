//! API request handlers for the QuietCool gateway.
//!
//! # Handler Modules
//!
//! - [`info`] - Root endpoint
//! - [`fans`] - Fan listing, details and control
//!
//! All handlers follow a consistent pattern:
//! - Accept `State<AppState>` for access to the fan aggregator
//! - Return `Result<Json<T>, ApiError>`: the typed result on success, a
//!   plain-text 500 on any hub-side failure
//! - Log operations using the `tracing` crate

pub mod fans;
pub mod info;
