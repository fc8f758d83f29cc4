// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report rendering to XLSX or CSV.

use mensajero_core::MensajeroError;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use strum::{Display, EnumString};

use crate::sheet_err;

/// Output encoding of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// A single exported value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// A `YYYY-MM-DD HH:MM:SS` timestamp, written as a real date in XLSX.
    /// Text in a column whose name contains "date" is treated the same way.
    Date(String),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn opt_date(value: Option<&str>) -> Self {
        match value {
            Some(v) => Cell::Date(v.to_string()),
            None => Cell::Empty,
        }
    }

    fn as_csv_field(&self) -> String {
        match self {
            Cell::Text(s) | Cell::Date(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

/// A named block of rows. Becomes one worksheet in XLSX output.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Excel number format for timestamps.
    pub date_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            date_format: "yyyy-mm-dd hh:mm:ss".to_string(),
        }
    }
}

/// Render tables into the requested format.
///
/// CSV output writes the tables one after another, each with its own header
/// row and separated by a record holding a single empty quoted field (`""`).
pub fn render(
    tables: &[Table],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, MensajeroError> {
    match format {
        ExportFormat::Xlsx => render_xlsx(tables, options),
        ExportFormat::Csv => render_csv(tables),
    }
}

fn render_xlsx(tables: &[Table], options: &ExportOptions) -> Result<Vec<u8>, MensajeroError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format(&options.date_format);

    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&table.name).map_err(sheet_err)?;
        let date_columns: Vec<bool> = table
            .columns
            .iter()
            .map(|name| name.to_lowercase().contains("date"))
            .collect();
        for (col, name) in table.columns.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, name, &header)
                .map_err(sheet_err)?;
        }
        for (idx, row) in table.rows.iter().enumerate() {
            let r = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                let in_date_column = date_columns.get(col).copied().unwrap_or(false);
                match cell {
                    Cell::Text(s) if !in_date_column => {
                        sheet.write_string(r, c, s).map_err(sheet_err)?;
                    }
                    Cell::Number(n) => {
                        sheet.write_number(r, c, *n).map_err(sheet_err)?;
                    }
                    Cell::Text(s) | Cell::Date(s) => match ExcelDateTime::parse_from_str(s) {
                        Ok(dt) => {
                            sheet
                                .write_datetime_with_format(r, c, &dt, &date)
                                .map_err(sheet_err)?;
                        }
                        Err(_) => {
                            sheet.write_string(r, c, s).map_err(sheet_err)?;
                        }
                    },
                    Cell::Empty => {}
                }
            }
        }
        sheet.autofit();
    }

    workbook.save_to_buffer().map_err(sheet_err)
}

fn render_csv(tables: &[Table]) -> Result<Vec<u8>, MensajeroError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for (idx, table) in tables.iter().enumerate() {
        if idx > 0 {
            writer.write_record([""]).map_err(sheet_err)?;
        }
        writer.write_record(&table.columns).map_err(sheet_err)?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(Cell::as_csv_field))
                .map_err(sheet_err)?;
        }
    }
    writer.into_inner().map_err(sheet_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportFormat, parse_shipments};

    fn shipments_table() -> Table {
        let mut table = Table::new(
            "shipments",
            &["sender", "tracking_number", "recipient", "address", "city", "dispatch_date"],
        );
        table.push(vec![
            "Tienda".into(),
            "A100".into(),
            "Luis".into(),
            "Calle 1".into(),
            "Cali".into(),
            Cell::Date("2024-03-01 08:00:00".to_string()),
        ]);
        table.push(vec![
            "Tienda".into(),
            "A101".into(),
            "Eva".into(),
            "Calle 2".into(),
            "Cali".into(),
            Cell::Empty,
        ]);
        table
    }

    #[test]
    fn csv_export_reimports() {
        let bytes = render(&[shipments_table()], ExportFormat::Csv, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("sender,tracking_number"));
        assert!(text.contains("2024-03-01 08:00:00"));

        let parsed = parse_shipments(&bytes, ImportFormat::Csv).unwrap();
        assert_eq!(parsed.shipments.len(), 2);
        assert_eq!(parsed.shipments[1].recipient, "Eva");
    }

    #[test]
    fn xlsx_export_reimports() {
        let bytes = render(&[shipments_table()], ExportFormat::Xlsx, &ExportOptions::default()).unwrap();
        assert_eq!(ImportFormat::sniff(&bytes), ImportFormat::Xlsx);
        let parsed = parse_shipments(&bytes, ImportFormat::Xlsx).unwrap();
        assert_eq!(parsed.shipments.len(), 2);
        assert_eq!(parsed.shipments[0].tracking_number, "A100");
    }

    #[test]
    fn csv_separates_multiple_tables() {
        let mut summary = Table::new("summary", &["courier", "total"]);
        summary.push(vec!["Ana".into(), 15000.0.into()]);
        let mut detail = Table::new("detail", &["tracking_number"]);
        detail.push(vec!["A1".into()]);

        let bytes = render(&[summary, detail], ExportFormat::Csv, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "courier,total\nAna,15000\n\"\"\ntracking_number\nA1\n");
    }

    #[test]
    fn invalid_sheet_name_is_a_sheet_error() {
        let table = Table::new("bad/name", &["a"]);
        let err = render(&[table], ExportFormat::Xlsx, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, MensajeroError::Sheet { .. }));
    }

    #[test]
    fn format_metadata() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::default().extension(), "xlsx");
        assert!(ExportFormat::Csv.content_type().starts_with("text/csv"));
    }
}
