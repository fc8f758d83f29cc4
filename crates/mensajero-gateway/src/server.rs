// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use mensajero_config::model::GatewayConfig;
use mensajero_core::MensajeroError;
use mensajero_tracking::Logistics;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub logistics: Arc<Logistics>,
    pub auth: AuthConfig,
    /// Name reported by the health endpoint.
    pub service_name: String,
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Build the application router.
///
/// `/health` is public; everything under `/v1` passes the auth middleware.
pub fn router(state: GatewayState, max_upload_bytes: usize) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/zones", get(handlers::list_zones).post(handlers::create_zone))
        .route(
            "/v1/couriers",
            get(handlers::list_couriers).post(handlers::create_courier),
        )
        .route(
            "/v1/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/v1/shipments/import", post(handlers::import_shipments))
        .route("/v1/shipments/{tracking_number}", get(handlers::get_shipment))
        .route("/v1/dispatches", post(handlers::create_dispatches))
        .route("/v1/receptions", post(handlers::create_reception))
        .route(
            "/v1/pickups",
            get(handlers::list_pickups).post(handlers::create_pickup),
        )
        .route("/v1/settlements", get(handlers::get_settlement))
        .route("/v1/exports/{report}", get(handlers::get_export))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), MensajeroError> {
    let app = router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MensajeroError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MensajeroError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_gateway_config() {
        let config = ServerConfig::from(&GatewayConfig::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }
}
