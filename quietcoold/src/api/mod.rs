//! API module for the QuietCool gateway
//!
//! Contains the HTTP API implementation with Axum router and handlers.

pub(crate) mod handlers;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use quietcool_hub::{CoapTransport, FanAggregator};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub(crate) struct AppState {
    /// Fan operations against any hub
    pub fans: FanAggregator,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(transport: Arc<dyn CoapTransport>) -> Self {
        Self {
            fans: FanAggregator::new(transport),
            start_time: Instant::now(),
        }
    }
}

/// Create the main API router with all endpoints
pub(crate) fn create_router(state: AppState) -> Router {
    info!("Setting up API router...");

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024));

    Router::new()
        // Fan listing and details
        .route("/fans/:ip", get(handlers::fans::list_fans))
        .route("/fans/:ip/:uid", get(handlers::fans::get_fan))
        // Fan control
        .route("/fans/:ip/:uid/power", post(handlers::fans::set_power))
        .route(
            "/fans/:ip/:uid/setCurrentSpeed",
            post(handlers::fans::set_current_speed),
        )
        .route(
            "/fans/:ip/:uid/updateSpeeds",
            post(handlers::fans::update_speeds),
        )
        .route(
            "/fans/:ip/:uid/remaining",
            post(handlers::fans::set_remaining),
        )
        .route(
            "/fans/:ip/:uid/sequence",
            post(handlers::fans::set_sequence),
        )
        // Root endpoint
        .route("/", get(handlers::info::root))
        .layer(middleware_stack)
        .with_state(state)
}

/// Error handling utilities
pub(crate) mod error {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use quietcool_core::QuietcoolError;
    use tracing::error;

    /// Failure reported to HTTP clients as plain text
    #[derive(Debug)]
    pub struct ApiError {
        pub status_code: StatusCode,
        pub message: String,
    }

    impl ApiError {
        /// Create a new API error
        pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
            Self {
                status_code,
                message: message.into(),
            }
        }

        /// Create an internal server error
        pub fn internal_error(message: impl Into<String>) -> Self {
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            error!("API Error {}: {}", self.status_code, self.message);

            (self.status_code, self.message).into_response()
        }
    }

    /// Every hub-side failure is a 500; the body names the kind
    impl From<QuietcoolError> for ApiError {
        fn from(err: QuietcoolError) -> Self {
            Self::internal_error(format!("{}: {}", err.kind(), err))
        }
    }

}
