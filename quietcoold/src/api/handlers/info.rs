//! Info handler for the root endpoint

use crate::api::AppState;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

/// Handle the root endpoint.
///
/// Provide basic service identification and status. Useful for health checks
/// and verifying the API is accessible. Never contacts a hub.
///
/// # Endpoint
///
/// `GET /`
///
/// # Returns
///
/// Return service name, version, status and uptime in seconds.
pub(crate) async fn root(State(state): State<AppState>) -> Json<Value> {
    debug!("Request: GET /");

    Json(json!({
        "service": "QuietCool Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "uptime": state.start_time.elapsed().as_secs(),
    }))
}
