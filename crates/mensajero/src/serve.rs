// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mensajero serve` command implementation.
//!
//! Opens the store, builds the [`Logistics`] facade and serves the HTTP API
//! until Ctrl-C, then checkpoints and closes the store.

use std::sync::Arc;

use mensajero_config::MensajeroConfig;
use mensajero_core::MensajeroError;
use mensajero_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use mensajero_tracking::Logistics;
use tracing::{info, warn};

/// Runs the `mensajero serve` command.
pub async fn run_serve(config: MensajeroConfig) -> Result<(), MensajeroError> {
    info!(service = %config.service.name, "starting mensajero serve");

    let logistics = Arc::new(Logistics::open(&config).await?);

    let snapshot = logistics.cache().snapshot();
    info!(
        zones = snapshot.zones().len(),
        couriers = snapshot.couriers().len(),
        "reference data loaded"
    );

    if config.gateway.bearer_token.is_none() && !is_loopback(&config.gateway.host) {
        warn!(
            host = %config.gateway.host,
            "gateway is reachable beyond this machine without a bearer token"
        );
    }

    let state = GatewayState {
        logistics: logistics.clone(),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        service_name: config.service.name.clone(),
    };
    let served = start_server(&ServerConfig::from(&config.gateway), state).await;

    logistics.shutdown().await?;
    info!("mensajero stopped");
    served
}

fn is_loopback(host: &str) -> bool {
    host == "localhost"
        || host
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}
