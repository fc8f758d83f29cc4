// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp text used for event rows, and date parsing for user input.

use chrono::{Local, NaiveDate, NaiveDateTime};
use mensajero_core::MensajeroError;

/// Stored timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted date layout for ranges and pickup dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Local wall-clock time, as stored.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, MensajeroError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        MensajeroError::InvalidInput(format!("{field} must be a YYYY-MM-DD date, got `{value}`"))
    })
}

/// Parse either `YYYY-MM-DD HH:MM:SS` or a bare date (taken as midnight).
pub fn parse_timestamp(field: &str, value: &str) -> Result<NaiveDateTime, MensajeroError> {
    let value = value.trim();
    if let Ok(at) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(at);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            MensajeroError::InvalidInput(format!(
                "{field} must be YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, got `{value}`"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_strictly() {
        assert!(parse_date("from", "2024-01-31").is_ok());
        assert!(parse_date("from", "2024-02-30").is_err());
        assert!(parse_date("from", "31/01/2024").is_err());
    }

    #[test]
    fn timestamps_accept_bare_dates() {
        let at = parse_timestamp("date", "2024-03-05").unwrap();
        assert_eq!(format_timestamp(at), "2024-03-05 00:00:00");
        let at = parse_timestamp("date", "2024-03-05 17:30:00").unwrap();
        assert_eq!(format_timestamp(at), "2024-03-05 17:30:00");
        assert!(matches!(
            parse_timestamp("date", "ayer"),
            Err(MensajeroError::InvalidInput(_))
        ));
    }
}
