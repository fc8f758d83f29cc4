// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spreadsheet import and export.
//!
//! Imports read the first worksheet of an XLSX workbook or a CSV file into
//! [`Shipment`](mensajero_core::types::Shipment) rows. Exports render named
//! tables into one workbook (one worksheet per table) or into CSV.

pub mod export;
pub mod import;

pub use export::{Cell, ExportFormat, ExportOptions, Table, render};
pub use import::{ImportFormat, ParsedImport, parse_shipments};

use mensajero_core::MensajeroError;

pub(crate) fn sheet_err(e: impl std::fmt::Display) -> MensajeroError {
    MensajeroError::Sheet {
        message: e.to_string(),
    }
}
