//! Destination relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                 DESTINATION RELAY                │
//!     GET /               │  ┌────────┐    ┌──────────────┐                  │
//!     ────────────────────┼─▶│  http  │───▶│ orchestrator │                  │
//!                         │  │ server │    └──────┬───────┘                  │
//!                         │  └────────┘           │                          │
//!                         │       ▲               ├──▶ token ───────────────┼──▶ {auth}/oauth/token
//!     HTML fragment       │       │               ├──▶ destination ─────────┼──▶ {dest}/destination-configuration/v1/...
//!     ◀───────────────────┼───────┘               └──▶ downstream ──────────┼──▶ {URL}srv/user
//!                         │                                                  │
//!                         │  config · observability · lifecycle              │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use destination_relay::config::loader;
use destination_relay::lifecycle::startup;
use destination_relay::observability::logging;

/// Relay browser requests to a destination resolved at runtime.
#[derive(Parser, Debug)]
#[command(name = "destination-relay", version, about)]
struct Cli {
    /// Optional TOML configuration file; VCAP_SERVICES and PORT override it.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = loader::load(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("destination-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        destination = %config.relay.destination_name,
        downstream_path = %config.relay.downstream_path,
        auth_server = %config.credentials.auth_server_url,
        destination_service = %config.credentials.destination_service_uri,
        "Configuration loaded"
    );
    if std::env::var_os(loader::VCAP_SERVICES).is_some() {
        tracing::info!(
            binding = %config.relay.service_binding,
            "Credentials taken from service binding"
        );
    } else {
        tracing::info!("No service bindings present; credentials taken from configuration file");
    }

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
