// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier settlement: dispatched count times the courier's current zone tariff.
//!
//! The tariff comes from the live reference snapshot, not from the zone
//! recorded on each dispatch. Detail rows keep the recorded zone so a
//! mismatch is visible in exports.

use std::sync::Arc;

use mensajero_core::types::{Dispatch, DispatchFilter};
use mensajero_core::{MensajeroError, StorageAdapter};
use serde::Serialize;
use tracing::debug;

use crate::cache::ReferenceCache;
use crate::clock;

/// Amount owed to a courier over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub courier: String,
    pub date_from: String,
    pub date_to: String,
    pub count: i64,
    pub tariff: f64,
    pub total: f64,
}

/// A settlement plus the dispatch rows it counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementDetail {
    pub summary: Settlement,
    pub dispatches: Vec<Dispatch>,
}

pub struct SettlementCalculator {
    storage: Arc<dyn StorageAdapter>,
    cache: Arc<ReferenceCache>,
}

impl SettlementCalculator {
    pub fn new(storage: Arc<dyn StorageAdapter>, cache: Arc<ReferenceCache>) -> Self {
        Self { storage, cache }
    }

    fn filter(courier: &str, date_from: &str, date_to: &str) -> Result<DispatchFilter, MensajeroError> {
        let from = clock::parse_date("date_from", date_from)?;
        let to = clock::parse_date("date_to", date_to)?;
        Ok(DispatchFilter {
            courier: Some(courier.to_string()),
            date_from: Some(from.format(clock::DATE_FORMAT).to_string()),
            date_to: Some(to.format(clock::DATE_FORMAT).to_string()),
        })
    }

    fn summarize(&self, filter: &DispatchFilter, count: i64) -> Settlement {
        let courier = filter.courier.clone().unwrap_or_default();
        let tariff = self.cache.snapshot().tariff_for(&courier);
        Settlement {
            courier,
            date_from: filter.date_from.clone().unwrap_or_default(),
            date_to: filter.date_to.clone().unwrap_or_default(),
            count,
            tariff,
            total: count as f64 * tariff,
        }
    }

    /// Settle `courier` for dispatches dated within `[date_from, date_to]`.
    ///
    /// Unknown couriers settle at a zero tariff. Malformed dates fail with
    /// `InvalidInput` before the store is queried.
    pub async fn compute(
        &self,
        courier: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<Settlement, MensajeroError> {
        let filter = Self::filter(courier, date_from, date_to)?;
        let count = self.storage.count_dispatches(&filter).await?;
        let settlement = self.summarize(&filter, count);
        debug!(
            courier,
            count = settlement.count,
            total = settlement.total,
            "settlement computed"
        );
        Ok(settlement)
    }

    /// Like [`compute`](Self::compute), also returning the counted rows.
    pub async fn detail(
        &self,
        courier: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<SettlementDetail, MensajeroError> {
        let filter = Self::filter(courier, date_from, date_to)?;
        let dispatches = self.storage.list_dispatches(&filter).await?;
        let summary = self.summarize(&filter, dispatches.len() as i64);
        Ok(SettlementDetail {
            summary,
            dispatches,
        })
    }
}
