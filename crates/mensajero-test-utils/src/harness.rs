// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` opens a [`Logistics`] facade over a temporary SQLite
//! database and seeds it with zones, couriers and shipments through the same
//! operations production code uses.

use std::sync::Arc;

use mensajero_config::model::{MensajeroConfig, StorageConfig};
use mensajero_core::MensajeroError;
use mensajero_sheets::ImportFormat;
use mensajero_tracking::Logistics;

/// A shipment sheet in CSV with one row per tracking number.
pub fn shipment_csv(tracking_numbers: &[&str]) -> String {
    let mut csv = String::from("sender,tracking_number,recipient,address,city\n");
    for n in tracking_numbers {
        csv.push_str(&format!("Tienda Uno,{n},Luis Pérez,Calle 10 # 4-21,Cali\n"));
    }
    csv
}

/// Builder for seeded test environments.
#[derive(Default)]
pub struct TestHarnessBuilder {
    zones: Vec<(String, f64)>,
    couriers: Vec<(String, String)>,
    customers: Vec<String>,
    shipments: Vec<String>,
    bearer_token: Option<String>,
}

impl TestHarnessBuilder {
    pub fn with_zone(mut self, name: &str, tariff: f64) -> Self {
        self.zones.push((name.to_string(), tariff));
        self
    }

    /// Register a courier. The zone must be added with [`with_zone`](Self::with_zone).
    pub fn with_courier(mut self, name: &str, zone: &str) -> Self {
        self.couriers.push((name.to_string(), zone.to_string()));
        self
    }

    pub fn with_customer(mut self, name: &str) -> Self {
        self.customers.push(name.to_string());
        self
    }

    /// Import shipments with these tracking numbers.
    pub fn with_shipments(mut self, tracking_numbers: &[&str]) -> Self {
        self.shipments
            .extend(tracking_numbers.iter().map(|n| n.to_string()));
        self
    }

    /// Set `gateway.bearer_token` in the harness config.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    /// Create the database and apply the seed data.
    pub async fn build(self) -> Result<TestHarness, MensajeroError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| MensajeroError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = MensajeroConfig {
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
            ..MensajeroConfig::default()
        };
        config.gateway.bearer_token = self.bearer_token;

        let logistics = Logistics::open(&config).await?;
        for (name, tariff) in &self.zones {
            logistics.register_zone(name, *tariff).await?;
        }
        for (name, zone) in &self.couriers {
            logistics.register_courier(name, zone).await?;
        }
        for name in &self.customers {
            logistics.register_customer(name).await?;
        }
        if !self.shipments.is_empty() {
            let numbers: Vec<&str> = self.shipments.iter().map(String::as_str).collect();
            logistics
                .import_shipments(shipment_csv(&numbers).as_bytes(), Some(ImportFormat::Csv))
                .await?;
        }
        tracing::debug!(path = %db_path.display(), "test harness ready");

        Ok(TestHarness {
            logistics: Arc::new(logistics),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A seeded environment backed by a temporary database.
pub struct TestHarness {
    pub logistics: Arc<Logistics>,
    /// Configuration pointing at the temporary database.
    pub config: MensajeroConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// The usual fixture: zone "Norte" at 5000, courier "Ana", and the given shipments.
    pub async fn with_defaults(tracking_numbers: &[&str]) -> Result<Self, MensajeroError> {
        Self::builder()
            .with_zone("Norte", 5000.0)
            .with_courier("Ana", "Norte")
            .with_shipments(tracking_numbers)
            .build()
            .await
    }
}
