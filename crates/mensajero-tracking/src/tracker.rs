// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write-time validation and status reads for shipment events.

use std::sync::Arc;

use chrono::NaiveDateTime;
use mensajero_core::types::{
    Courier, Dispatch, NewPickup, OutcomeKind, Pickup, Reception, ShipmentStatus, Zone,
};
use mensajero_core::{MensajeroError, StorageAdapter};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ReferenceCache;
use crate::clock;
use crate::status::{check_dispatch, check_reception, derive_status};

/// One tracking number that could not be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub tracking_number: String,
    pub code: &'static str,
    pub message: String,
}

/// Outcome of a batch dispatch: successes and failures side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDispatchReport {
    pub dispatched: Vec<Dispatch>,
    pub failed: Vec<BatchFailure>,
}

/// Records dispatches, receptions and pickups, and answers status queries.
pub struct ShipmentTracker {
    storage: Arc<dyn StorageAdapter>,
    cache: Arc<ReferenceCache>,
}

impl ShipmentTracker {
    pub fn new(storage: Arc<dyn StorageAdapter>, cache: Arc<ReferenceCache>) -> Self {
        Self { storage, cache }
    }

    /// Courier and zone as currently registered.
    fn resolve_courier(&self, courier_name: &str) -> Result<(Courier, Zone), MensajeroError> {
        let snapshot = self.cache.snapshot();
        let courier = snapshot
            .courier(courier_name)
            .ok_or_else(|| MensajeroError::courier_not_found(courier_name))?;
        let zone = snapshot
            .zone_of(courier)
            .ok_or_else(|| MensajeroError::NotFound {
                entity: "zone",
                key: format!("zone of courier {courier_name}"),
            })?;
        Ok((courier.clone(), zone.clone()))
    }

    /// Assign a shipment to a courier now.
    pub async fn record_dispatch(
        &self,
        tracking_number: &str,
        courier_name: &str,
    ) -> Result<Dispatch, MensajeroError> {
        self.record_dispatch_at(tracking_number, courier_name, clock::now())
            .await
    }

    /// Assign a shipment to a courier with an explicit timestamp.
    pub async fn record_dispatch_at(
        &self,
        tracking_number: &str,
        courier_name: &str,
        at: NaiveDateTime,
    ) -> Result<Dispatch, MensajeroError> {
        let (courier, zone) = self.resolve_courier(courier_name)?;
        self.dispatch_one(tracking_number, &courier, &zone, at).await
    }

    async fn dispatch_one(
        &self,
        tracking_number: &str,
        courier: &Courier,
        zone: &Zone,
        at: NaiveDateTime,
    ) -> Result<Dispatch, MensajeroError> {
        let events = self.storage.shipment_events(tracking_number).await?;
        if let Err(e) = check_dispatch(&events) {
            debug!(tracking_number, error = %e, "dispatch rejected");
            return Err(e);
        }

        let dispatch = Dispatch {
            tracking_number: tracking_number.to_string(),
            courier: courier.name.clone(),
            zone: zone.name.clone(),
            dispatched_at: clock::format_timestamp(at),
        };
        // A concurrent dispatch can win between the check and the insert.
        if !self.storage.insert_dispatch(&dispatch).await? {
            warn!(tracking_number, "lost dispatch race");
            return Err(MensajeroError::AlreadyDispatched {
                tracking_number: tracking_number.to_string(),
            });
        }
        info!(
            tracking_number,
            courier = %dispatch.courier,
            zone = %dispatch.zone,
            "shipment dispatched"
        );
        Ok(dispatch)
    }

    /// Dispatch several tracking numbers to one courier.
    ///
    /// An unknown courier fails the whole request. Otherwise each number is
    /// tried on its own and failures are collected next to the successes.
    pub async fn dispatch_batch(
        &self,
        tracking_numbers: &[String],
        courier_name: &str,
    ) -> Result<BatchDispatchReport, MensajeroError> {
        let (courier, zone) = self.resolve_courier(courier_name)?;
        let at = clock::now();
        let mut report = BatchDispatchReport::default();

        for tracking_number in tracking_numbers {
            match self.dispatch_one(tracking_number, &courier, &zone, at).await {
                Ok(dispatch) => report.dispatched.push(dispatch),
                Err(e) if e.is_user_error() => report.failed.push(BatchFailure {
                    tracking_number: tracking_number.clone(),
                    code: e.code(),
                    message: e.to_string(),
                }),
                Err(e) => return Err(e),
            }
        }

        info!(
            courier = courier_name,
            dispatched = report.dispatched.len(),
            failed = report.failed.len(),
            "batch dispatch finished"
        );
        Ok(report)
    }

    /// Record the outcome of a dispatched shipment now.
    pub async fn record_reception(
        &self,
        tracking_number: &str,
        outcome: OutcomeKind,
        reason: &str,
    ) -> Result<Reception, MensajeroError> {
        self.record_reception_at(tracking_number, outcome, reason, clock::now())
            .await
    }

    /// Record the outcome of a dispatched shipment with an explicit timestamp.
    ///
    /// The reason is kept only for returns.
    pub async fn record_reception_at(
        &self,
        tracking_number: &str,
        outcome: OutcomeKind,
        reason: &str,
        at: NaiveDateTime,
    ) -> Result<Reception, MensajeroError> {
        let events = self.storage.shipment_events(tracking_number).await?;
        if let Err(e) = check_reception(&events) {
            debug!(tracking_number, error = %e, "reception rejected");
            return Err(e);
        }

        let reception = Reception {
            tracking_number: tracking_number.to_string(),
            outcome,
            reason: match outcome {
                OutcomeKind::Returned => reason.trim().to_string(),
                OutcomeKind::Delivered => String::new(),
            },
            received_at: clock::format_timestamp(at),
        };
        if !self.storage.insert_reception(&reception).await? {
            warn!(tracking_number, "lost reception race");
            return Err(MensajeroError::AlreadyReceived {
                tracking_number: tracking_number.to_string(),
            });
        }
        info!(tracking_number, %outcome, "shipment received");
        Ok(reception)
    }

    /// Current status of a tracking number. Never fails for unknown numbers.
    pub async fn query_status(&self, tracking_number: &str) -> Result<ShipmentStatus, MensajeroError> {
        let events = self.storage.shipment_events(tracking_number).await?;
        Ok(derive_status(events))
    }

    /// Log a pickup. The tracking number need not belong to a shipment.
    ///
    /// `date` accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` and defaults to now.
    pub async fn record_pickup(
        &self,
        tracking_number: &str,
        date: Option<&str>,
        notes: &str,
        customer: Option<&str>,
    ) -> Result<Pickup, MensajeroError> {
        let tracking_number = tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(MensajeroError::InvalidInput(
                "tracking number must not be empty".into(),
            ));
        }
        let at = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => clock::parse_timestamp("date", d)?,
            None => clock::now(),
        };
        let customer_id = match customer.map(str::trim).filter(|c| !c.is_empty()) {
            Some(name) => Some(
                self.storage
                    .get_customer_by_name(name)
                    .await?
                    .ok_or_else(|| MensajeroError::NotFound {
                        entity: "customer",
                        key: name.to_string(),
                    })?
                    .id,
            ),
            None => None,
        };

        let pickup = self
            .storage
            .insert_pickup(&NewPickup {
                tracking_number: tracking_number.to_string(),
                picked_up_at: clock::format_timestamp(at),
                notes: notes.trim().to_string(),
                customer_id,
            })
            .await?;
        info!(tracking_number, id = pickup.id, "pickup recorded");
        Ok(pickup)
    }

    /// Every pickup, newest first.
    pub async fn list_pickups(&self) -> Result<Vec<Pickup>, MensajeroError> {
        self.storage.list_pickups().await
    }
}
