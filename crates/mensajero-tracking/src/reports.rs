// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tabular reports for export.

use std::sync::Arc;

use mensajero_core::types::DispatchFilter;
use mensajero_core::{MensajeroError, StorageAdapter};
use mensajero_sheets::{Cell, Table};
use strum::{Display, EnumString};

use crate::clock;
use crate::settlement::SettlementCalculator;
use crate::status::derive_status;

/// Reports available for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportKind {
    Shipments,
    Dispatches,
    Receptions,
    Pickups,
    Settlement,
}

/// Optional courier and inclusive date range narrowing a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub courier: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ReportQuery {
    fn dispatch_filter(&self) -> Result<DispatchFilter, MensajeroError> {
        let date = |field: &str, value: &Option<String>| -> Result<Option<String>, MensajeroError> {
            value
                .as_deref()
                .map(|v| clock::parse_date(field, v).map(|d| d.format(clock::DATE_FORMAT).to_string()))
                .transpose()
        };
        Ok(DispatchFilter {
            courier: self.courier.clone(),
            date_from: date("date_from", &self.date_from)?,
            date_to: date("date_to", &self.date_to)?,
        })
    }
}

pub struct Reports {
    storage: Arc<dyn StorageAdapter>,
    settlement: Arc<SettlementCalculator>,
}

impl Reports {
    pub fn new(storage: Arc<dyn StorageAdapter>, settlement: Arc<SettlementCalculator>) -> Self {
        Self {
            storage,
            settlement,
        }
    }

    /// Build the tables of a report.
    pub async fn build(
        &self,
        kind: ReportKind,
        query: &ReportQuery,
    ) -> Result<Vec<Table>, MensajeroError> {
        match kind {
            ReportKind::Shipments => self.shipments().await,
            ReportKind::Dispatches => self.dispatches(query).await,
            ReportKind::Receptions => self.receptions().await,
            ReportKind::Pickups => self.pickups().await,
            ReportKind::Settlement => self.settlement(query).await,
        }
    }

    async fn shipments(&self) -> Result<Vec<Table>, MensajeroError> {
        let mut table = Table::new(
            "shipments",
            &[
                "sender",
                "tracking_number",
                "recipient",
                "address",
                "city",
                "status",
                "courier",
                "zone",
                "dispatch_date",
                "reception_date",
                "reason",
            ],
        );
        for events in self.storage.list_shipment_events().await? {
            let status = derive_status(events);
            let Some(shipment) = status.shipment else {
                continue;
            };
            table.push(vec![
                shipment.sender.into(),
                shipment.tracking_number.into(),
                shipment.recipient.into(),
                shipment.address.into(),
                shipment.city.into(),
                status.state.to_string().into(),
                status.courier.unwrap_or_default().into(),
                status.zone.unwrap_or_default().into(),
                Cell::opt_date(status.dispatched_at.as_deref()),
                Cell::opt_date(status.received_at.as_deref()),
                status.reason.unwrap_or_default().into(),
            ]);
        }
        Ok(vec![table])
    }

    async fn dispatches(&self, query: &ReportQuery) -> Result<Vec<Table>, MensajeroError> {
        let filter = query.dispatch_filter()?;
        let mut table = dispatch_table("dispatches");
        for d in self.storage.list_dispatches(&filter).await? {
            table.push(vec![
                d.tracking_number.into(),
                d.courier.into(),
                d.zone.into(),
                Cell::Date(d.dispatched_at),
            ]);
        }
        Ok(vec![table])
    }

    async fn receptions(&self) -> Result<Vec<Table>, MensajeroError> {
        let mut table = Table::new(
            "receptions",
            &["tracking_number", "outcome", "reason", "reception_date"],
        );
        for r in self.storage.list_receptions().await? {
            table.push(vec![
                r.tracking_number.into(),
                r.outcome.to_string().into(),
                r.reason.into(),
                Cell::Date(r.received_at),
            ]);
        }
        Ok(vec![table])
    }

    async fn pickups(&self) -> Result<Vec<Table>, MensajeroError> {
        let mut table = Table::new(
            "pickups",
            &["tracking_number", "pickup_date", "customer", "notes"],
        );
        for p in self.storage.list_pickups().await? {
            table.push(vec![
                p.tracking_number.into(),
                Cell::Date(p.picked_up_at),
                p.customer.unwrap_or_default().into(),
                p.notes.into(),
            ]);
        }
        Ok(vec![table])
    }

    async fn settlement(&self, query: &ReportQuery) -> Result<Vec<Table>, MensajeroError> {
        let (Some(courier), Some(from), Some(to)) =
            (&query.courier, &query.date_from, &query.date_to)
        else {
            return Err(MensajeroError::InvalidInput(
                "settlement report needs courier, date_from and date_to".into(),
            ));
        };
        let detail = self.settlement.detail(courier, from, to).await?;

        let mut summary = Table::new(
            "summary",
            &["courier", "from", "to", "count", "tariff", "total"],
        );
        let s = &detail.summary;
        summary.push(vec![
            s.courier.as_str().into(),
            s.date_from.as_str().into(),
            s.date_to.as_str().into(),
            s.count.into(),
            s.tariff.into(),
            s.total.into(),
        ]);

        let mut rows = dispatch_table("detail");
        for d in detail.dispatches {
            rows.push(vec![
                d.tracking_number.into(),
                d.courier.into(),
                d.zone.into(),
                Cell::Date(d.dispatched_at),
            ]);
        }
        Ok(vec![summary, rows])
    }
}

fn dispatch_table(name: &str) -> Table {
    Table::new(name, &["tracking_number", "courier", "zone", "dispatch_date"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_names_parse() {
        assert_eq!("Settlement".parse::<ReportKind>().unwrap(), ReportKind::Settlement);
        assert_eq!(ReportKind::Pickups.to_string(), "pickups");
        assert!("payroll".parse::<ReportKind>().is_err());
    }

    #[test]
    fn query_dates_are_validated() {
        let query = ReportQuery {
            date_from: Some("2024-13-01".into()),
            ..ReportQuery::default()
        };
        assert!(matches!(
            query.dispatch_filter(),
            Err(MensajeroError::InvalidInput(_))
        ));
    }
}
