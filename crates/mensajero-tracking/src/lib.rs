// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment lifecycle tracking for Mensajero.
//!
//! [`Logistics`] ties together the reference cache, registration, the state
//! tracker, settlement, imports and reports over one [`StorageAdapter`]. Every
//! mutation goes through it so the reference cache is reloaded afterwards.

pub mod cache;
pub mod clock;
pub mod registry;
pub mod reports;
pub mod settlement;
pub mod status;
pub mod tracker;

use std::sync::Arc;

use mensajero_config::model::MensajeroConfig;
use mensajero_core::types::{Customer, OutcomeKind, Pickup, Reception, ShipmentStatus, Zone};
use mensajero_core::{HealthStatus, MensajeroError, StorageAdapter};
use mensajero_sheets::{ExportFormat, ExportOptions, ImportFormat};
use mensajero_storage::SqliteStorage;
use serde::Serialize;
use tracing::info;

pub use cache::{ReferenceCache, ReferenceSnapshot};
pub use registry::{CourierView, Registry, parse_tariff};
pub use reports::{ReportKind, ReportQuery, Reports};
pub use settlement::{Settlement, SettlementCalculator, SettlementDetail};
pub use tracker::{BatchDispatchReport, BatchFailure, ShipmentTracker};

/// Split a typed list of tracking numbers on commas or newlines, trimming
/// each entry and dropping blanks.
pub fn parse_tracking_numbers(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Counts reported after a shipment import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows with a tracking number.
    pub rows: usize,
    /// Rows that became new shipments.
    pub inserted: usize,
    /// Rows whose tracking number was already present.
    pub skipped: usize,
    /// Rows without a tracking number.
    pub blank: usize,
}

/// A rendered export ready to be written or served.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Facade over every shipment-tracking operation.
pub struct Logistics {
    storage: Arc<dyn StorageAdapter>,
    cache: Arc<ReferenceCache>,
    registry: Registry,
    tracker: ShipmentTracker,
    settlement: Arc<SettlementCalculator>,
    reports: Reports,
    export_options: ExportOptions,
}

impl Logistics {
    /// Build over an already initialized store.
    pub async fn new(
        storage: Arc<dyn StorageAdapter>,
        export_options: ExportOptions,
    ) -> Result<Self, MensajeroError> {
        let cache = Arc::new(ReferenceCache::load(storage.clone()).await?);
        let settlement = Arc::new(SettlementCalculator::new(storage.clone(), cache.clone()));
        Ok(Self {
            registry: Registry::new(storage.clone(), cache.clone()),
            tracker: ShipmentTracker::new(storage.clone(), cache.clone()),
            reports: Reports::new(storage.clone(), settlement.clone()),
            settlement,
            cache,
            storage,
            export_options,
        })
    }

    /// Open the SQLite store named in `config` and build over it.
    pub async fn open(config: &MensajeroConfig) -> Result<Self, MensajeroError> {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        info!(path = %config.storage.database_path, "store ready");
        let options = ExportOptions {
            date_format: config.export.date_format.clone(),
        };
        Self::new(Arc::new(storage), options).await
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn tracker(&self) -> &ShipmentTracker {
        &self.tracker
    }

    pub async fn health(&self) -> HealthStatus {
        match self.storage.health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }

    /// Flush and close the store.
    pub async fn shutdown(&self) -> Result<(), MensajeroError> {
        self.storage.close().await
    }

    async fn after_write(&self) -> Result<(), MensajeroError> {
        self.cache.reload().await
    }

    // --- Reference data ---

    pub async fn register_zone(&self, name: &str, tariff: f64) -> Result<Zone, MensajeroError> {
        self.registry.register_zone(name, tariff).await
    }

    pub async fn register_courier(
        &self,
        name: &str,
        zone_name: &str,
    ) -> Result<CourierView, MensajeroError> {
        self.registry.register_courier(name, zone_name).await
    }

    pub async fn register_customer(&self, name: &str) -> Result<Customer, MensajeroError> {
        let customer = self.registry.register_customer(name).await?;
        self.after_write().await?;
        Ok(customer)
    }

    pub fn list_zones(&self) -> Vec<Zone> {
        self.registry.list_zones()
    }

    pub fn list_couriers(&self) -> Vec<CourierView> {
        self.registry.list_couriers()
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, MensajeroError> {
        self.registry.list_customers().await
    }

    // --- Shipments ---

    /// Load shipments from a sheet. Already known tracking numbers are
    /// skipped silently; `format` is sniffed from the bytes when `None`.
    pub async fn import_shipments(
        &self,
        bytes: &[u8],
        format: Option<ImportFormat>,
    ) -> Result<ImportReport, MensajeroError> {
        let format = format.unwrap_or_else(|| ImportFormat::sniff(bytes));
        let parsed = mensajero_sheets::parse_shipments(bytes, format)?;
        let inserted = self.storage.insert_shipments(&parsed.shipments).await?;
        self.after_write().await?;

        let report = ImportReport {
            rows: parsed.shipments.len(),
            inserted,
            skipped: parsed.shipments.len() - inserted,
            blank: parsed.blank_rows,
        };
        info!(
            rows = report.rows,
            inserted = report.inserted,
            skipped = report.skipped,
            "shipments imported"
        );
        Ok(report)
    }

    pub async fn dispatch(
        &self,
        tracking_numbers: &[String],
        courier: &str,
    ) -> Result<BatchDispatchReport, MensajeroError> {
        let numbers: Vec<String> = tracking_numbers
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        let report = self.tracker.dispatch_batch(&numbers, courier.trim()).await?;
        self.after_write().await?;
        Ok(report)
    }

    pub async fn receive(
        &self,
        tracking_number: &str,
        outcome: OutcomeKind,
        reason: &str,
    ) -> Result<Reception, MensajeroError> {
        let reception = self
            .tracker
            .record_reception(tracking_number.trim(), outcome, reason)
            .await?;
        self.after_write().await?;
        Ok(reception)
    }

    pub async fn status(&self, tracking_number: &str) -> Result<ShipmentStatus, MensajeroError> {
        self.tracker.query_status(tracking_number.trim()).await
    }

    pub async fn record_pickup(
        &self,
        tracking_number: &str,
        date: Option<&str>,
        notes: &str,
        customer: Option<&str>,
    ) -> Result<Pickup, MensajeroError> {
        let pickup = self
            .tracker
            .record_pickup(tracking_number, date, notes, customer)
            .await?;
        self.after_write().await?;
        Ok(pickup)
    }

    pub async fn list_pickups(&self) -> Result<Vec<Pickup>, MensajeroError> {
        self.tracker.list_pickups().await
    }

    // --- Settlement and reports ---

    pub async fn settle(
        &self,
        courier: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<Settlement, MensajeroError> {
        self.settlement.compute(courier.trim(), date_from, date_to).await
    }

    pub async fn settle_detail(
        &self,
        courier: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<SettlementDetail, MensajeroError> {
        self.settlement.detail(courier.trim(), date_from, date_to).await
    }

    /// Render a report in the requested format.
    pub async fn export(
        &self,
        kind: ReportKind,
        query: &ReportQuery,
        format: ExportFormat,
    ) -> Result<ExportFile, MensajeroError> {
        let tables = self.reports.build(kind, query).await?;
        let bytes = mensajero_sheets::render(&tables, format, &self.export_options)?;
        Ok(ExportFile {
            file_name: format!("{kind}.{}", format.extension()),
            format,
            bytes,
        })
    }
}
