// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands run against the local store.
//!
//! Each command returns the text to print so `main` decides where it goes.

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use mensajero_core::MensajeroError;
use mensajero_core::types::{OutcomeKind, ShipmentState, ShipmentStatus};
use mensajero_sheets::{ExportFormat, ImportFormat};
use mensajero_tracking::{
    Logistics, ReportKind, ReportQuery, Settlement, parse_tariff, parse_tracking_numbers,
};

/// Terminal output styling.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    /// Colors only when stdout is a terminal and `--plain` was not given.
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn ok(&self, text: &str) -> String {
        if self.color {
            format!("{} {text}", "✓".green())
        } else {
            format!("[OK] {text}")
        }
    }

    fn fail(&self, text: &str) -> String {
        if self.color {
            format!("{} {text}", "✗".red())
        } else {
            format!("[FAIL] {text}")
        }
    }

    fn state(&self, state: ShipmentState) -> String {
        let label = state.to_string();
        if !self.color {
            return label;
        }
        match state {
            ShipmentState::Missing => label.dimmed().to_string(),
            ShipmentState::InVerification => label.yellow().to_string(),
            ShipmentState::Dispatched => label.cyan().to_string(),
            ShipmentState::Delivered => label.green().to_string(),
            ShipmentState::Returned => label.red().to_string(),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, MensajeroError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MensajeroError::Internal(format!("failed to encode JSON: {e}")))
}

fn parse_arg<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, MensajeroError> {
    value
        .trim()
        .parse()
        .map_err(|_| MensajeroError::InvalidInput(format!("unsupported {name} `{value}`")))
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

pub async fn import(
    logistics: &Logistics,
    file: &Path,
    format: Option<&str>,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let format = match format {
        Some(f) => Some(parse_arg::<ImportFormat>("format", f)?),
        None => extension(file).and_then(ImportFormat::from_extension),
    };
    let bytes = std::fs::read(file).map_err(|e| {
        MensajeroError::InvalidInput(format!("cannot read {}: {e}", file.display()))
    })?;
    let report = logistics.import_shipments(&bytes, format).await?;
    Ok(printer.ok(&format!(
        "imported {} of {} shipments ({} already present, {} blank rows)",
        report.inserted, report.rows, report.skipped, report.blank
    )))
}

pub async fn add_zone(
    logistics: &Logistics,
    name: &str,
    tariff: &str,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let zone = logistics.register_zone(name, parse_tariff(tariff)?).await?;
    Ok(printer.ok(&format!("zone {} registered at {}", zone.name, zone.tariff)))
}

pub fn list_zones(logistics: &Logistics) -> String {
    let zones = logistics.list_zones();
    if zones.is_empty() {
        return "no zones registered".to_string();
    }
    let width = zones.iter().map(|z| z.name.len()).max().unwrap_or(0);
    zones
        .iter()
        .map(|z| format!("{:<width$}  {}", z.name, z.tariff))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn add_courier(
    logistics: &Logistics,
    name: &str,
    zone: &str,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let courier = logistics.register_courier(name, zone).await?;
    Ok(printer.ok(&format!(
        "courier {} registered in {}",
        courier.name,
        courier.zone.as_deref().unwrap_or(zone)
    )))
}

pub fn list_couriers(logistics: &Logistics) -> String {
    let couriers = logistics.list_couriers();
    if couriers.is_empty() {
        return "no couriers registered".to_string();
    }
    let width = couriers.iter().map(|c| c.name.len()).max().unwrap_or(0);
    couriers
        .iter()
        .map(|c| {
            format!(
                "{:<width$}  {}  {}",
                c.name,
                c.zone.as_deref().unwrap_or("-"),
                c.tariff.map_or_else(|| "-".to_string(), |t| t.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn add_customer(
    logistics: &Logistics,
    name: &str,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let customer = logistics.register_customer(name).await?;
    Ok(printer.ok(&format!("customer {} registered", customer.name)))
}

pub async fn list_customers(logistics: &Logistics) -> Result<String, MensajeroError> {
    let customers = logistics.list_customers().await?;
    if customers.is_empty() {
        return Ok("no customers registered".to_string());
    }
    Ok(customers
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Dispatch every number given, one line per tracking number.
pub async fn dispatch(
    logistics: &Logistics,
    courier: &str,
    args: &[String],
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let numbers: Vec<String> = args.iter().flat_map(|a| parse_tracking_numbers(a)).collect();
    if numbers.is_empty() {
        return Err(MensajeroError::InvalidInput("no tracking numbers given".into()));
    }
    let report = logistics.dispatch(&numbers, courier).await?;

    let mut lines: Vec<String> = report
        .dispatched
        .iter()
        .map(|d| printer.ok(&format!("{} -> {} ({})", d.tracking_number, d.courier, d.zone)))
        .collect();
    lines.extend(
        report
            .failed
            .iter()
            .map(|f| printer.fail(&format!("{}: {}", f.tracking_number, f.message))),
    );
    lines.push(format!(
        "{} dispatched, {} failed",
        report.dispatched.len(),
        report.failed.len()
    ));
    Ok(lines.join("\n"))
}

pub async fn receive(
    logistics: &Logistics,
    tracking_number: &str,
    outcome: &str,
    reason: &str,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let outcome: OutcomeKind = parse_arg("outcome", outcome)?;
    let reception = logistics.receive(tracking_number, outcome, reason).await?;
    Ok(printer.ok(&format!(
        "{} recorded as {}",
        reception.tracking_number, reception.outcome
    )))
}

pub async fn pickup(
    logistics: &Logistics,
    tracking_number: &str,
    date: Option<&str>,
    notes: &str,
    customer: Option<&str>,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let pickup = logistics
        .record_pickup(tracking_number, date, notes, customer)
        .await?;
    Ok(printer.ok(&format!(
        "pickup of {} logged at {}",
        pickup.tracking_number, pickup.picked_up_at
    )))
}

pub async fn status(
    logistics: &Logistics,
    tracking_number: &str,
    json: bool,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let status = logistics.status(tracking_number).await?;
    if json {
        return to_json(&status);
    }
    Ok(render_status(&status, printer))
}

fn render_status(status: &ShipmentStatus, printer: &Printer) -> String {
    let mut lines = vec![
        format!("  {}", status.tracking_number),
        format!("  {}", "-".repeat(35)),
        format!("    State:      {}", printer.state(status.state)),
    ];
    if let Some(shipment) = &status.shipment {
        lines.push(format!("    Sender:     {}", shipment.sender));
        lines.push(format!("    Recipient:  {}", shipment.recipient));
        lines.push(format!("    Address:    {}, {}", shipment.address, shipment.city));
    }
    if let (Some(courier), Some(zone)) = (&status.courier, &status.zone) {
        lines.push(format!("    Courier:    {courier} ({zone})"));
    }
    if let Some(at) = &status.dispatched_at {
        lines.push(format!("    Dispatched: {at}"));
    }
    if let Some(at) = &status.received_at {
        lines.push(format!("    Received:   {at}"));
    }
    if let Some(reason) = status.reason.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("    Reason:     {reason}"));
    }
    lines.join("\n")
}

pub async fn settle(
    logistics: &Logistics,
    courier: &str,
    from: &str,
    to: &str,
    json: bool,
) -> Result<String, MensajeroError> {
    let settlement = logistics.settle(courier, from, to).await?;
    if json {
        return to_json(&settlement);
    }
    Ok(render_settlement(&settlement))
}

fn render_settlement(s: &Settlement) -> String {
    format!(
        "{} from {} to {}: {} shipments x {} = {}",
        s.courier, s.date_from, s.date_to, s.count, s.tariff, s.total
    )
}

/// Render a report and write it to `out`.
///
/// Without `format` the output extension decides; anything but `.csv`
/// produces a workbook.
pub async fn export(
    logistics: &Logistics,
    report: &str,
    out: &Path,
    format: Option<&str>,
    query: &ReportQuery,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    let kind: ReportKind = parse_arg("report", report)?;
    let format = match format {
        Some(f) => parse_arg::<ExportFormat>("format", f)?,
        None => extension(out)
            .and_then(|e| e.parse::<ExportFormat>().ok())
            .unwrap_or_default(),
    };
    let file = logistics.export(kind, query, format).await?;
    std::fs::write(out, &file.bytes).map_err(|e| {
        MensajeroError::InvalidInput(format!("cannot write {}: {e}", out.display()))
    })?;
    Ok(printer.ok(&format!(
        "{kind} report written to {} ({} bytes)",
        out.display(),
        file.bytes.len()
    )))
}
