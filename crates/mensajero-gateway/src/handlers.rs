// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the JSON API.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use mensajero_core::types::{Customer, OutcomeKind, Pickup, Reception, ShipmentStatus, Zone};
use mensajero_core::{HealthStatus, MensajeroError};
use mensajero_sheets::{ExportFormat, ImportFormat};
use mensajero_tracking::{
    BatchDispatchReport, CourierView, ImportReport, ReportKind, ReportQuery, Settlement,
    parse_tracking_numbers,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<T, ApiError>;

fn parse_param<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| MensajeroError::InvalidInput(format!("unsupported {name} `{value}`")).into())
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status, detail) = match state.logistics.health().await {
        HealthStatus::Healthy => (StatusCode::OK, "ok", None),
        HealthStatus::Degraded(d) => (StatusCode::OK, "degraded", Some(d)),
        HealthStatus::Unhealthy(d) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(d)),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            service: state.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            detail,
        }),
    )
        .into_response()
}

// --- Reference data ---

#[derive(Debug, Deserialize)]
pub struct ZoneRequest {
    pub name: String,
    pub tariff: f64,
}

/// GET /v1/zones
pub async fn list_zones(State(state): State<GatewayState>) -> Json<Vec<Zone>> {
    Json(state.logistics.list_zones())
}

/// POST /v1/zones
pub async fn create_zone(
    State(state): State<GatewayState>,
    Json(body): Json<ZoneRequest>,
) -> ApiResult<(StatusCode, Json<Zone>)> {
    let zone = state.logistics.register_zone(&body.name, body.tariff).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

#[derive(Debug, Deserialize)]
pub struct CourierRequest {
    pub name: String,
    pub zone: String,
}

/// GET /v1/couriers
pub async fn list_couriers(State(state): State<GatewayState>) -> Json<Vec<CourierView>> {
    Json(state.logistics.list_couriers())
}

/// POST /v1/couriers
pub async fn create_courier(
    State(state): State<GatewayState>,
    Json(body): Json<CourierRequest>,
) -> ApiResult<(StatusCode, Json<CourierView>)> {
    let courier = state
        .logistics
        .register_courier(&body.name, &body.zone)
        .await?;
    Ok((StatusCode::CREATED, Json(courier)))
}

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
}

/// GET /v1/customers
pub async fn list_customers(State(state): State<GatewayState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.logistics.list_customers().await?))
}

/// POST /v1/customers
pub async fn create_customer(
    State(state): State<GatewayState>,
    Json(body): Json<CustomerRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let customer = state.logistics.register_customer(&body.name).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// --- Shipments ---

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    pub format: Option<String>,
}

/// POST /v1/shipments/import
///
/// The body is the raw sheet; `format` overrides sniffing.
pub async fn import_shipments(
    State(state): State<GatewayState>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> ApiResult<Json<ImportReport>> {
    let format = params
        .format
        .as_deref()
        .map(|f| parse_param::<ImportFormat>("format", f))
        .transpose()?;
    let report = state.logistics.import_shipments(&body, format).await?;
    Ok(Json(report))
}

/// GET /v1/shipments/{tracking_number}
pub async fn get_shipment(
    State(state): State<GatewayState>,
    Path(tracking_number): Path<String>,
) -> ApiResult<Json<ShipmentStatus>> {
    Ok(Json(state.logistics.status(&tracking_number).await?))
}

/// Tracking numbers as a JSON list or as comma-separated text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrackingNumbers {
    List(Vec<String>),
    Text(String),
}

impl TrackingNumbers {
    fn into_vec(self) -> Vec<String> {
        match self {
            TrackingNumbers::List(list) => list,
            TrackingNumbers::Text(text) => parse_tracking_numbers(&text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub courier: String,
    pub tracking_numbers: TrackingNumbers,
}

/// POST /v1/dispatches
///
/// Per-number failures are reported in the body; the request itself only
/// fails when the courier is unknown.
pub async fn create_dispatches(
    State(state): State<GatewayState>,
    Json(body): Json<DispatchRequest>,
) -> ApiResult<Json<BatchDispatchReport>> {
    let numbers = body.tracking_numbers.into_vec();
    if numbers.is_empty() {
        return Err(MensajeroError::InvalidInput("no tracking numbers given".into()).into());
    }
    Ok(Json(state.logistics.dispatch(&numbers, &body.courier).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReceptionRequest {
    pub tracking_number: String,
    pub outcome: String,
    #[serde(default)]
    pub reason: String,
}

/// POST /v1/receptions
pub async fn create_reception(
    State(state): State<GatewayState>,
    Json(body): Json<ReceptionRequest>,
) -> ApiResult<(StatusCode, Json<Reception>)> {
    let outcome: OutcomeKind = parse_param("outcome", &body.outcome)?;
    let reception = state
        .logistics
        .receive(&body.tracking_number, outcome, &body.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(reception)))
}

// --- Pickups ---

#[derive(Debug, Deserialize)]
pub struct PickupRequest {
    pub tracking_number: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// GET /v1/pickups
pub async fn list_pickups(State(state): State<GatewayState>) -> ApiResult<Json<Vec<Pickup>>> {
    Ok(Json(state.logistics.list_pickups().await?))
}

/// POST /v1/pickups
pub async fn create_pickup(
    State(state): State<GatewayState>,
    Json(body): Json<PickupRequest>,
) -> ApiResult<(StatusCode, Json<Pickup>)> {
    let pickup = state
        .logistics
        .record_pickup(
            &body.tracking_number,
            body.date.as_deref(),
            &body.notes,
            body.customer.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(pickup)))
}

// --- Settlement and exports ---

#[derive(Debug, Deserialize)]
pub struct SettlementParams {
    pub courier: String,
    pub from: String,
    pub to: String,
}

/// GET /v1/settlements
pub async fn get_settlement(
    State(state): State<GatewayState>,
    Query(params): Query<SettlementParams>,
) -> ApiResult<Json<Settlement>> {
    let settlement = state
        .logistics
        .settle(&params.courier, &params.from, &params.to)
        .await?;
    Ok(Json(settlement))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
    pub courier: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /v1/exports/{report}
pub async fn get_export(
    State(state): State<GatewayState>,
    Path(report): Path<String>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let kind: ReportKind = parse_param("report", &report)?;
    let format = match params.format.as_deref() {
        Some(f) => parse_param::<ExportFormat>("format", f)?,
        None => ExportFormat::default(),
    };
    let query = ReportQuery {
        courier: params.courier,
        date_from: params.from,
        date_to: params.to,
    };
    let file = state.logistics.export(kind, &query, format).await?;
    Ok((
        [
            (header::CONTENT_TYPE, file.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
