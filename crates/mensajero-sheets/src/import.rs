// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment import from CSV or XLSX.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use mensajero_core::MensajeroError;
use mensajero_core::types::{SHIPMENT_COLUMNS, Shipment};
use strum::{Display, EnumString};
use tracing::debug;

use crate::sheet_err;

/// Encoding of an uploaded shipment sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Guess the format from the leading bytes: zip and OLE containers are
    /// workbooks, anything else is treated as CSV.
    pub fn sniff(bytes: &[u8]) -> Self {
        const ZIP: &[u8] = b"PK\x03\x04";
        const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
        if bytes.starts_with(ZIP) || bytes.starts_with(OLE) {
            ImportFormat::Xlsx
        } else {
            ImportFormat::Csv
        }
    }

    /// Format implied by a file extension, if recognised.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(ImportFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(ImportFormat::Xlsx),
            _ => None,
        }
    }
}

/// Rows read from an import sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    pub shipments: Vec<Shipment>,
    /// Data rows dropped because their tracking number was blank.
    pub blank_rows: usize,
}

/// Parse a shipment sheet.
///
/// The first row is the header. Header names are matched after trimming,
/// lowercasing, and turning spaces and hyphens into underscores; extra
/// columns are ignored. Fails with `ImportSchema` if any required column is
/// absent.
pub fn parse_shipments(bytes: &[u8], format: ImportFormat) -> Result<ParsedImport, MensajeroError> {
    let rows = match format {
        ImportFormat::Csv => read_csv(bytes)?,
        ImportFormat::Xlsx => read_workbook(bytes)?,
    };
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let positions = column_positions(&header)?;

    let mut parsed = ParsedImport::default();
    for row in rows {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let field = |idx: usize| row.get(positions[idx]).cloned().unwrap_or_default();
        let shipment = Shipment {
            sender: field(0),
            tracking_number: field(1),
            recipient: field(2),
            address: field(3),
            city: field(4),
        };
        if shipment.tracking_number.is_empty() {
            parsed.blank_rows += 1;
            continue;
        }
        parsed.shipments.push(shipment);
    }
    debug!(
        rows = parsed.shipments.len(),
        blank = parsed.blank_rows,
        %format,
        "parsed shipment sheet"
    );
    Ok(parsed)
}

fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Index of each required column, in `SHIPMENT_COLUMNS` order.
fn column_positions(header: &[String]) -> Result<[usize; 5], MensajeroError> {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let mut positions = [0; 5];
    let mut missing = Vec::new();
    for (slot, column) in SHIPMENT_COLUMNS.iter().enumerate() {
        match normalized.iter().position(|h| h == column) {
            Some(idx) => positions[slot] = idx,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(MensajeroError::ImportSchema {
            missing,
            required: SHIPMENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
    }
    Ok(positions)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, MensajeroError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(sheet_err)
        })
        .collect()
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, MensajeroError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(sheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| sheet_err("workbook has no worksheets"))?
        .map_err(sheet_err)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Text of a workbook cell. Whole floats lose their fraction so numeric
/// tracking numbers read back as typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "sender,tracking_number,recipient,address,city";

    #[test]
    fn csv_rows_are_trimmed_and_blank_numbers_skipped() {
        let csv = format!(
            "{HEADER}\nTienda, A100 ,Luis,Calle 1,Cali\nTienda,,Ana,Calle 2,Cali\n,,,,\nTienda,A101,Eva,Calle 3,Pasto\n"
        );
        let parsed = parse_shipments(csv.as_bytes(), ImportFormat::Csv).unwrap();
        assert_eq!(parsed.shipments.len(), 2);
        assert_eq!(parsed.shipments[0].tracking_number, "A100");
        assert_eq!(parsed.shipments[1].city, "Pasto");
        assert_eq!(parsed.blank_rows, 1);
    }

    #[test]
    fn headers_match_in_any_order_and_case() {
        let csv = "City,Tracking Number,Extra,Recipient,Sender,Address\nCali,Z9,x,Luis,Tienda,Calle 1\n";
        let parsed = parse_shipments(csv.as_bytes(), ImportFormat::Csv).unwrap();
        let s = &parsed.shipments[0];
        assert_eq!(s.tracking_number, "Z9");
        assert_eq!(s.sender, "Tienda");
        assert_eq!(s.city, "Cali");
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = parse_shipments(b"sender,tracking_number,recipient\n", ImportFormat::Csv)
            .unwrap_err();
        match err {
            MensajeroError::ImportSchema { missing, required } => {
                assert_eq!(missing, vec!["address", "city"]);
                assert_eq!(required.len(), 5);
            }
            other => panic!("expected ImportSchema, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_lacks_every_column() {
        let err = parse_shipments(b"", ImportFormat::Csv).unwrap_err();
        assert!(matches!(err, MensajeroError::ImportSchema { ref missing, .. } if missing.len() == 5));
    }

    #[test]
    fn xlsx_workbook_is_read_from_first_sheet() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in SHIPMENT_COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "Tienda").unwrap();
        sheet.write_number(1, 1, 90012.0).unwrap();
        sheet.write_string(1, 2, "Luis").unwrap();
        sheet.write_string(1, 3, "Calle 1").unwrap();
        sheet.write_string(1, 4, "Cali").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        assert_eq!(ImportFormat::sniff(&bytes), ImportFormat::Xlsx);
        let parsed = parse_shipments(&bytes, ImportFormat::Xlsx).unwrap();
        assert_eq!(parsed.shipments.len(), 1);
        assert_eq!(parsed.shipments[0].tracking_number, "90012");
    }

    #[test]
    fn garbage_workbook_is_a_sheet_error() {
        let err = parse_shipments(b"PK\x03\x04garbage", ImportFormat::Xlsx).unwrap_err();
        assert!(matches!(err, MensajeroError::Sheet { .. }));
    }

    #[test]
    fn format_parsing_and_extensions() {
        assert_eq!("XLSX".parse::<ImportFormat>().unwrap(), ImportFormat::Xlsx);
        assert_eq!(ImportFormat::from_extension("CSV"), Some(ImportFormat::Csv));
        assert_eq!(ImportFormat::from_extension("pdf"), None);
        assert_eq!(ImportFormat::sniff(HEADER.as_bytes()), ImportFormat::Csv);
    }
}
