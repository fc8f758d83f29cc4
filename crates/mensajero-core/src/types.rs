// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, the tracker and the request layers.
//!
//! Timestamps are carried as `YYYY-MM-DD HH:MM:SS` strings, the same text the
//! store persists and the export layer formats as dates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Columns every shipment import must provide, in export order.
pub const SHIPMENT_COLUMNS: [&str; 5] = ["sender", "tracking_number", "recipient", "address", "city"];

/// Row identifier of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub i64);

/// Row identifier of a courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourierId(pub i64);

/// Row identifier of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A delivery zone with the flat tariff paid per dispatched shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub tariff: f64,
}

/// A courier assigned to exactly one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Courier {
    pub id: CourierId,
    pub name: String,
    pub zone_id: ZoneId,
}

/// A pickup customer. Names are unique ignoring case, accented letters included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub created_at: String,
}

/// A shipment loaded from the import sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub sender: String,
    pub tracking_number: String,
    pub recipient: String,
    pub address: String,
    pub city: String,
}

/// Assignment of a shipment to a courier.
///
/// `zone` is the courier's zone name at the time of dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub tracking_number: String,
    pub courier: String,
    pub zone: String,
    pub dispatched_at: String,
}

/// Terminal outcome of a dispatched shipment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Delivered,
    Returned,
}

/// Outcome of a dispatched shipment. `reason` is empty unless `Returned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reception {
    pub tracking_number: String,
    pub outcome: OutcomeKind,
    pub reason: String,
    pub received_at: String,
}

/// A pickup log entry. The tracking number need not match a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: i64,
    pub tracking_number: String,
    pub picked_up_at: String,
    pub notes: String,
    pub customer: Option<String>,
}

/// Insert form of a [`Pickup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPickup {
    pub tracking_number: String,
    pub picked_up_at: String,
    pub notes: String,
    pub customer_id: Option<CustomerId>,
}

/// The three lookups that decide a shipment's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentEvents {
    pub tracking_number: String,
    pub shipment: Option<Shipment>,
    pub dispatch: Option<Dispatch>,
    pub reception: Option<Reception>,
}

/// Derived lifecycle state of a tracking number. Never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentState {
    Missing,
    InVerification,
    Dispatched,
    Delivered,
    Returned,
}

impl From<OutcomeKind> for ShipmentState {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Delivered => ShipmentState::Delivered,
            OutcomeKind::Returned => ShipmentState::Returned,
        }
    }
}

/// Display status of a tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentStatus {
    pub tracking_number: String,
    pub state: ShipmentState,
    pub shipment: Option<Shipment>,
    pub courier: Option<String>,
    pub zone: Option<String>,
    pub dispatched_at: Option<String>,
    pub reason: Option<String>,
    pub received_at: Option<String>,
}

/// Filter for dispatch listings. Dates are inclusive `YYYY-MM-DD` bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchFilter {
    pub courier: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn outcome_kind_parses_any_case() {
        assert_eq!(OutcomeKind::from_str("returned").unwrap(), OutcomeKind::Returned);
        assert_eq!(OutcomeKind::from_str("DELIVERED").unwrap(), OutcomeKind::Delivered);
        assert!(OutcomeKind::from_str("lost").is_err());
        assert_eq!(OutcomeKind::Returned.to_string(), "RETURNED");
    }

    #[test]
    fn shipment_state_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&ShipmentState::InVerification).unwrap();
        assert_eq!(json, "\"IN_VERIFICATION\"");
        assert_eq!(ShipmentState::InVerification.to_string(), "IN_VERIFICATION");
    }

    #[test]
    fn outcome_maps_to_terminal_state() {
        assert_eq!(ShipmentState::from(OutcomeKind::Delivered), ShipmentState::Delivered);
        assert_eq!(ShipmentState::from(OutcomeKind::Returned), ShipmentState::Returned);
    }
}
