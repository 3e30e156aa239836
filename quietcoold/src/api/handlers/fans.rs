//! Fan handlers for listing and control endpoints

use crate::api::error::ApiError;
use crate::api::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use quietcool_core::{
    ControlStatus, FanDetails, FanIdentity, FanList, PowerCommand, RemainingTimeCommand,
    SequenceCommand, SpeedCommand, UpdateSpeedsCommand,
};
use tracing::debug;

/// Lists every fan behind a hub with its info and status.
///
/// Fans are ordered by the hub-assigned id, compared as text. If any single
/// fan cannot be read the whole request fails.
///
/// # Endpoint
///
/// `GET /fans/:ip`
pub(crate) async fn list_fans(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<FanList>, ApiError> {
    debug!("Request: GET /fans/{}", ip);

    let list = state.fans.list_fans(&ip).await?;
    debug!("Hub {} returned {} fan(s)", ip, list.fans.len());
    Ok(Json(list))
}

/// Info and status of a single fan.
///
/// # Endpoint
///
/// `GET /fans/:ip/:uid`
pub(crate) async fn get_fan(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
) -> Result<Json<FanDetails>, ApiError> {
    debug!("Request: GET /fans/{}/{}", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.get_fan_details(&id).await?))
}

/// Turns a fan on (run indefinitely) or off.
///
/// # Endpoint
///
/// `POST /fans/:ip/:uid/power` with body `{"on": true}`
pub(crate) async fn set_power(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
    Json(command): Json<PowerCommand>,
) -> Result<Json<ControlStatus>, ApiError> {
    debug!("Request: POST /fans/{}/{}/power", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.set_power(&id, command).await?))
}

/// Sets the speed the fan is running at right now.
///
/// # Endpoint
///
/// `POST /fans/:ip/:uid/setCurrentSpeed` with body `{"speed": "2"}`
pub(crate) async fn set_current_speed(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
    Json(command): Json<SpeedCommand>,
) -> Result<Json<ControlStatus>, ApiError> {
    debug!("Request: POST /fans/{}/{}/setCurrentSpeed", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.set_current_speed(&id, command).await?))
}

/// Sets how many speed presets the fan offers.
///
/// `"3"`, `"2"` and `"1"` select the matching sequence; any other value
/// selects the three-speed sequence.
///
/// # Endpoint
///
/// `POST /fans/:ip/:uid/updateSpeeds` with body `{"speeds": "3"}`
pub(crate) async fn update_speeds(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
    Json(command): Json<UpdateSpeedsCommand>,
) -> Result<Json<ControlStatus>, ApiError> {
    debug!("Request: POST /fans/{}/{}/updateSpeeds", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.update_speeds(&id, command).await?))
}

/// `POST /fans/:ip/:uid/remaining` with body `{"remaining": 120}`
pub(crate) async fn set_remaining(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
    Json(command): Json<RemainingTimeCommand>,
) -> Result<Json<ControlStatus>, ApiError> {
    debug!("Request: POST /fans/{}/{}/remaining", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.set_remaining(&id, command).await?))
}

/// `POST /fans/:ip/:uid/sequence` with body `{"sequence": 4}`
pub(crate) async fn set_sequence(
    State(state): State<AppState>,
    Path((ip, uid)): Path<(String, String)>,
    Json(command): Json<SequenceCommand>,
) -> Result<Json<ControlStatus>, ApiError> {
    debug!("Request: POST /fans/{}/{}/sequence", ip, uid);

    let id = FanIdentity::new(ip, uid);
    Ok(Json(state.fans.set_sequence(&id, command).await?))
}
