// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration and listing of zones, couriers and customers.

use std::sync::Arc;

use mensajero_core::types::{Customer, Zone};
use mensajero_core::{MensajeroError, StorageAdapter};
use serde::Serialize;
use tracing::info;

use crate::cache::ReferenceCache;

/// A courier with its zone resolved from the reference snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierView {
    pub name: String,
    pub zone: Option<String>,
    pub tariff: Option<f64>,
}

/// Parse a tariff typed by a user.
pub fn parse_tariff(value: &str) -> Result<f64, MensajeroError> {
    let tariff: f64 = value
        .trim()
        .parse()
        .map_err(|_| MensajeroError::InvalidInput(format!("tariff `{value}` is not a number")))?;
    validate_tariff(tariff)?;
    Ok(tariff)
}

fn validate_tariff(tariff: f64) -> Result<(), MensajeroError> {
    if !tariff.is_finite() || tariff < 0.0 {
        return Err(MensajeroError::InvalidInput(format!(
            "tariff must be a non-negative number, got {tariff}"
        )));
    }
    Ok(())
}

fn required_name(kind: &str, name: &str) -> Result<String, MensajeroError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MensajeroError::InvalidInput(format!("{kind} name must not be empty")));
    }
    Ok(name.to_string())
}

/// Reference data registration. Zone and courier writes reload the cache.
pub struct Registry {
    storage: Arc<dyn StorageAdapter>,
    cache: Arc<ReferenceCache>,
}

impl Registry {
    pub fn new(storage: Arc<dyn StorageAdapter>, cache: Arc<ReferenceCache>) -> Self {
        Self { storage, cache }
    }

    pub async fn register_zone(&self, name: &str, tariff: f64) -> Result<Zone, MensajeroError> {
        let name = required_name("zone", name)?;
        validate_tariff(tariff)?;
        let zone = self
            .storage
            .insert_zone(&name, tariff)
            .await?
            .ok_or_else(|| MensajeroError::DuplicateRegistration {
                entity: "zone",
                name: name.clone(),
            })?;
        self.cache.reload().await?;
        info!(zone = %zone.name, tariff, "zone registered");
        Ok(zone)
    }

    pub async fn register_courier(
        &self,
        name: &str,
        zone_name: &str,
    ) -> Result<CourierView, MensajeroError> {
        let name = required_name("courier", name)?;
        let zone_name = zone_name.trim();
        let zone = self
            .storage
            .get_zone_by_name(zone_name)
            .await?
            .ok_or_else(|| MensajeroError::NotFound {
                entity: "zone",
                key: zone_name.to_string(),
            })?;
        let courier = self
            .storage
            .insert_courier(&name, zone.id)
            .await?
            .ok_or_else(|| MensajeroError::DuplicateRegistration {
                entity: "courier",
                name: name.clone(),
            })?;
        self.cache.reload().await?;
        info!(courier = %courier.name, zone = %zone.name, "courier registered");
        Ok(CourierView {
            name: courier.name,
            zone: Some(zone.name),
            tariff: Some(zone.tariff),
        })
    }

    pub async fn register_customer(&self, name: &str) -> Result<Customer, MensajeroError> {
        let name = required_name("customer", name)?;
        let customer = self
            .storage
            .insert_customer(&name)
            .await?
            .ok_or_else(|| MensajeroError::DuplicateRegistration {
                entity: "customer",
                name: name.clone(),
            })?;
        info!(customer = %customer.name, "customer registered");
        Ok(customer)
    }

    /// Zones from the reference snapshot.
    pub fn list_zones(&self) -> Vec<Zone> {
        self.cache.snapshot().zones().to_vec()
    }

    /// Couriers from the reference snapshot, with their zone resolved.
    pub fn list_couriers(&self) -> Vec<CourierView> {
        let snapshot = self.cache.snapshot();
        snapshot
            .couriers()
            .iter()
            .map(|c| {
                let zone = snapshot.zone_of(c);
                CourierView {
                    name: c.name.clone(),
                    zone: zone.map(|z| z.name.clone()),
                    tariff: zone.map(|z| z.tariff),
                }
            })
            .collect()
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, MensajeroError> {
        self.storage.list_customers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tariffs_must_be_finite_and_non_negative() {
        assert_eq!(parse_tariff(" 5000 ").unwrap(), 5000.0);
        assert_eq!(parse_tariff("0").unwrap(), 0.0);
        for bad in ["-1", "NaN", "inf", "cinco", ""] {
            assert!(
                matches!(parse_tariff(bad), Err(MensajeroError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(required_name("zone", "  Norte ").unwrap(), "Norte");
        assert!(required_name("zone", "   ").is_err());
    }
}
