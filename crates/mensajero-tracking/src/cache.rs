// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory snapshot of zones and couriers.
//!
//! The snapshot is rebuilt wholesale by [`ReferenceCache::reload`]; readers
//! hold an `Arc` to whichever snapshot was current when they asked, so a
//! reload never disturbs a request already in flight.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use mensajero_core::types::{Courier, Zone, ZoneId};
use mensajero_core::{MensajeroError, StorageAdapter};
use tracing::debug;

/// Zones and couriers as of the last reload.
#[derive(Debug, Default)]
pub struct ReferenceSnapshot {
    zones: Vec<Zone>,
    couriers: Vec<Courier>,
    zone_index: HashMap<ZoneId, usize>,
    courier_index: HashMap<String, usize>,
}

impl ReferenceSnapshot {
    pub fn new(zones: Vec<Zone>, couriers: Vec<Courier>) -> Self {
        let zone_index = zones.iter().enumerate().map(|(i, z)| (z.id, i)).collect();
        let courier_index = couriers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            zones,
            couriers,
            zone_index,
            courier_index,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn couriers(&self) -> &[Courier] {
        &self.couriers
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zone_index.get(&id).map(|&i| &self.zones[i])
    }

    pub fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn courier(&self, name: &str) -> Option<&Courier> {
        self.courier_index.get(name).map(|&i| &self.couriers[i])
    }

    /// The zone a courier belongs to.
    pub fn zone_of(&self, courier: &Courier) -> Option<&Zone> {
        self.zone(courier.zone_id)
    }

    /// Current tariff for a courier, zero when the courier or its zone is unknown.
    pub fn tariff_for(&self, courier_name: &str) -> f64 {
        self.courier(courier_name)
            .and_then(|c| self.zone_of(c))
            .map_or(0.0, |z| z.tariff)
    }
}

/// Read-through cache of reference data owned by the request layer.
pub struct ReferenceCache {
    storage: Arc<dyn StorageAdapter>,
    current: ArcSwap<ReferenceSnapshot>,
}

impl ReferenceCache {
    /// Build the cache and perform the first load.
    pub async fn load(storage: Arc<dyn StorageAdapter>) -> Result<Self, MensajeroError> {
        let cache = Self {
            storage,
            current: ArcSwap::from_pointee(ReferenceSnapshot::default()),
        };
        cache.reload().await?;
        Ok(cache)
    }

    /// Replace the snapshot with fresh zone and courier lists from the store.
    pub async fn reload(&self) -> Result<(), MensajeroError> {
        let zones = self.storage.list_zones().await?;
        let couriers = self.storage.list_couriers().await?;
        debug!(zones = zones.len(), couriers = couriers.len(), "reference cache reloaded");
        self.current
            .store(Arc::new(ReferenceSnapshot::new(zones, couriers)));
        Ok(())
    }

    /// The snapshot as of the last reload.
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensajero_core::types::CourierId;

    fn snapshot() -> ReferenceSnapshot {
        ReferenceSnapshot::new(
            vec![Zone {
                id: ZoneId(7),
                name: "Norte".into(),
                tariff: 5000.0,
            }],
            vec![
                Courier {
                    id: CourierId(1),
                    name: "Ana".into(),
                    zone_id: ZoneId(7),
                },
                Courier {
                    id: CourierId(2),
                    name: "Beto".into(),
                    zone_id: ZoneId(99),
                },
            ],
        )
    }

    #[test]
    fn courier_resolves_zone_by_id() {
        let snap = snapshot();
        let ana = snap.courier("Ana").unwrap();
        assert_eq!(snap.zone_of(ana).unwrap().name, "Norte");
        assert_eq!(snap.tariff_for("Ana"), 5000.0);
    }

    #[test]
    fn unresolved_links_give_zero_tariff() {
        let snap = snapshot();
        assert!(snap.zone_of(snap.courier("Beto").unwrap()).is_none());
        assert_eq!(snap.tariff_for("Beto"), 0.0);
        assert_eq!(snap.tariff_for("Nadie"), 0.0);
    }
}
