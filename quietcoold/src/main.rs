//! QuietCool Gateway
//!
//! HTTP API server that relays fan listing and control requests to
//! QuietCool hubs over CoAP.
//!
//! The hub to talk to is part of every request path, so a single daemon can
//! serve any number of hubs. Only the HTTP listener and the CoAP client
//! settings come from configuration.

mod api;
mod config;
mod shutdown;

use anyhow::{Context, Result};
use api::AppState;
use clap::Parser;
use quietcool_core::default_config_path;
use quietcool_hub::UdpCoapClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// QuietCool API Server
#[derive(Parser, Debug)]
#[command(name = "quietcoold")]
#[command(version, about = "QuietCool Fan Gateway API Server", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server bind address (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Server port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose);

    info!("QuietCool Gateway starting...");

    // Determine config path: CLI flag > env var > default
    let config_path = args.config.unwrap_or_else(|| {
        std::env::var("QUIETCOOL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    });
    info!("Configuration file: {}", config_path.display());

    let static_config = config::load_static_config(&config_path)
        .await
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    info!("Configuration loaded successfully");

    let server_config = &static_config.server;
    let bind = args.bind.unwrap_or_else(|| server_config.bind.clone());
    let port = args.port.unwrap_or(server_config.port);
    let bind_addr = format!("{}:{}", bind, port);

    info!(
        "Hubs reached on CoAP port {} with a {}ms request timeout",
        static_config.hub.coap_port, static_config.hub.request_timeout_ms
    );
    let transport = Arc::new(UdpCoapClient::from_config(&static_config.hub));

    // Set up API router
    let app = api::create_router(AppState::new(transport));

    // Start server
    info!("Starting server on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("QuietCool API Server listening on {}", bind_addr);
    info!("Server ready!");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "quietcoold",
            "--config",
            "/tmp/qc.toml",
            "--bind",
            "0.0.0.0",
            "-p",
            "9000",
            "-v",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/qc.toml")));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9000));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_default_to_config_file() {
        let args = Args::parse_from(["quietcoold"]);
        assert!(args.config.is_none());
        assert!(args.bind.is_none());
        assert!(args.port.is_none());
        assert!(!args.verbose);
    }
}
