//! # multiclimated: multiclimate daemon
//!
//! Composition root that wires the virtual installation into the climate
//! platform and serves service calls.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing`
//! - Construct the virtual heating system (adapter)
//! - Set up the climate platform and the service handler
//! - Read one JSON service call per line from stdin, dispatch it and log the
//!   resulting entity states
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use multiclimate_adapter_virtual::{VirtualConfig, VirtualHeatingSystem};
use multiclimate_app::climate::ClimatePlatform;
use multiclimate_app::services::ServiceHandler;
use multiclimate_domain::service::ServiceCall;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Installation
    let installation = if config.installation.is_empty() {
        tracing::info!("no installation configured, using the demo installation");
        VirtualConfig::demo()?
    } else {
        config.installation
    };
    let system = Arc::new(VirtualHeatingSystem::new(installation));

    // Platform and services
    let platform = ClimatePlatform::setup(&system, &system, config.system.application);
    let handler = ServiceHandler::new(Arc::clone(&system), platform);
    log_states(&handler);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let call: ServiceCall = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed service call");
                continue;
            }
        };
        match handler.handle(&call).await {
            Ok(()) => {
                tracing::info!(service = %call.service, "service call handled");
                log_states(&handler);
            }
            Err(err) => tracing::error!(service = %call.service, error = %err, "service call failed"),
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

fn log_states(handler: &ServiceHandler<VirtualHeatingSystem, VirtualHeatingSystem>) {
    for snapshot in handler.platform().snapshots() {
        match serde_json::to_string(&snapshot) {
            Ok(state) => tracing::info!(entity_id = %snapshot.unique_id, %state, "climate state"),
            Err(err) => tracing::warn!(entity_id = %snapshot.unique_id, error = %err, "cannot serialise state"),
        }
    }
}
