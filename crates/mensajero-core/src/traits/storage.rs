// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persisted store.

use async_trait::async_trait;

use crate::error::MensajeroError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Courier, Customer, Dispatch, DispatchFilter, NewPickup, Pickup, Reception,
    Shipment, ShipmentEvents, Zone, ZoneId,
};

/// Adapter for the relational store holding reference data and shipment
/// events.
///
/// Inserts that collide with a uniqueness constraint report the collision as
/// `None`/`false` rather than an error, so callers decide which domain error
/// applies. Event inserts are atomic with respect to their uniqueness check.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), MensajeroError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), MensajeroError>;

    // --- Reference data ---

    /// Inserts a zone. Returns `None` if the name is taken.
    async fn insert_zone(&self, name: &str, tariff: f64) -> Result<Option<Zone>, MensajeroError>;

    async fn list_zones(&self) -> Result<Vec<Zone>, MensajeroError>;

    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, MensajeroError>;

    /// Inserts a courier. Returns `None` if the name is taken.
    async fn insert_courier(
        &self,
        name: &str,
        zone_id: ZoneId,
    ) -> Result<Option<Courier>, MensajeroError>;

    async fn list_couriers(&self) -> Result<Vec<Courier>, MensajeroError>;

    /// Inserts a customer. Returns `None` if the name is taken, ignoring case.
    async fn insert_customer(&self, name: &str) -> Result<Option<Customer>, MensajeroError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, MensajeroError>;

    async fn get_customer_by_name(&self, name: &str)
    -> Result<Option<Customer>, MensajeroError>;

    // --- Shipments and events ---

    /// Inserts shipments whose tracking number is absent. Returns the number
    /// of rows inserted.
    async fn insert_shipments(&self, shipments: &[Shipment]) -> Result<usize, MensajeroError>;

    /// Looks up the shipment, dispatch and reception rows for one number.
    async fn shipment_events(&self, tracking_number: &str)
    -> Result<ShipmentEvents, MensajeroError>;

    /// Event rows for every imported shipment, ordered by tracking number.
    async fn list_shipment_events(&self) -> Result<Vec<ShipmentEvents>, MensajeroError>;

    /// Inserts a dispatch. Returns `false` if the number was already dispatched.
    async fn insert_dispatch(&self, dispatch: &Dispatch) -> Result<bool, MensajeroError>;

    async fn list_dispatches(
        &self,
        filter: &DispatchFilter,
    ) -> Result<Vec<Dispatch>, MensajeroError>;

    async fn count_dispatches(&self, filter: &DispatchFilter) -> Result<i64, MensajeroError>;

    /// Inserts a reception. Returns `false` if the number was already received.
    async fn insert_reception(&self, reception: &Reception) -> Result<bool, MensajeroError>;

    async fn list_receptions(&self) -> Result<Vec<Reception>, MensajeroError>;

    async fn insert_pickup(&self, pickup: &NewPickup) -> Result<Pickup, MensajeroError>;

    /// Pickups, newest first.
    async fn list_pickups(&self) -> Result<Vec<Pickup>, MensajeroError>;
}
