// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use mensajero_config::model::StorageConfig;
use mensajero_core::types::{
    Courier, Customer, Dispatch, DispatchFilter, NewPickup, Pickup, Reception, Shipment,
    ShipmentEvents, Zone, ZoneId,
};
use mensajero_core::{HealthStatus, MensajeroError, PluginAdapter, StorageAdapter};

use crate::database::{Database, OpenOptions};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, MensajeroError> {
        self.db.get().ok_or_else(|| MensajeroError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), MensajeroError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, MensajeroError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        let probe = db
            .connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await;
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), MensajeroError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MensajeroError> {
        let db = Database::open_with(&self.config.database_path, OpenOptions::from(&self.config))
            .await?;
        self.db.set(db).map_err(|_| MensajeroError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MensajeroError> {
        self.db()?;
        self.checkpoint().await
    }

    // --- Reference data ---

    async fn insert_zone(&self, name: &str, tariff: f64) -> Result<Option<Zone>, MensajeroError> {
        queries::zones::insert_zone(self.db()?, name, tariff).await
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, MensajeroError> {
        queries::zones::list_zones(self.db()?).await
    }

    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, MensajeroError> {
        queries::zones::get_zone_by_name(self.db()?, name).await
    }

    async fn insert_courier(
        &self,
        name: &str,
        zone_id: ZoneId,
    ) -> Result<Option<Courier>, MensajeroError> {
        queries::couriers::insert_courier(self.db()?, name, zone_id).await
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>, MensajeroError> {
        queries::couriers::list_couriers(self.db()?).await
    }

    async fn insert_customer(&self, name: &str) -> Result<Option<Customer>, MensajeroError> {
        queries::customers::insert_customer(self.db()?, name).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, MensajeroError> {
        queries::customers::list_customers(self.db()?).await
    }

    async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>, MensajeroError> {
        queries::customers::get_customer_by_name(self.db()?, name).await
    }

    // --- Shipments and events ---

    async fn insert_shipments(&self, shipments: &[Shipment]) -> Result<usize, MensajeroError> {
        queries::shipments::insert_shipments(self.db()?, shipments).await
    }

    async fn shipment_events(&self, tracking_number: &str) -> Result<ShipmentEvents, MensajeroError> {
        queries::shipments::shipment_events(self.db()?, tracking_number).await
    }

    async fn list_shipment_events(&self) -> Result<Vec<ShipmentEvents>, MensajeroError> {
        queries::shipments::list_shipment_events(self.db()?).await
    }

    async fn insert_dispatch(&self, dispatch: &Dispatch) -> Result<bool, MensajeroError> {
        queries::dispatches::insert_dispatch(self.db()?, dispatch).await
    }

    async fn list_dispatches(
        &self,
        filter: &DispatchFilter,
    ) -> Result<Vec<Dispatch>, MensajeroError> {
        queries::dispatches::list_dispatches(self.db()?, filter).await
    }

    async fn count_dispatches(&self, filter: &DispatchFilter) -> Result<i64, MensajeroError> {
        queries::dispatches::count_dispatches(self.db()?, filter).await
    }

    async fn insert_reception(&self, reception: &Reception) -> Result<bool, MensajeroError> {
        queries::receptions::insert_reception(self.db()?, reception).await
    }

    async fn list_receptions(&self) -> Result<Vec<Reception>, MensajeroError> {
        queries::receptions::list_receptions(self.db()?).await
    }

    async fn insert_pickup(&self, pickup: &NewPickup) -> Result<Pickup, MensajeroError> {
        queries::pickups::insert_pickup(self.db()?, pickup).await
    }

    async fn list_pickups(&self) -> Result<Vec<Pickup>, MensajeroError> {
        queries::pickups::list_pickups(self.db()?).await
    }
}
