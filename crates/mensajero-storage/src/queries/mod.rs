// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the reference, shipment and event tables.

pub mod couriers;
pub mod customers;
pub mod dispatches;
pub mod pickups;
pub mod receptions;
pub mod shipments;
pub mod zones;

use mensajero_core::OutcomeKind;

/// Read an outcome column, rejecting values outside the two known kinds.
pub(crate) fn outcome_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<OutcomeKind> {
    let text: String = row.get(idx)?;
    text.parse::<OutcomeKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::{TempDir, tempdir};

    use mensajero_core::types::Shipment;

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    pub fn make_shipment(tracking_number: &str) -> Shipment {
        Shipment {
            sender: "Tienda Uno".to_string(),
            tracking_number: tracking_number.to_string(),
            recipient: "Luis Pérez".to_string(),
            address: "Calle 10 # 4-21".to_string(),
            city: "Bogotá".to_string(),
        }
    }
}
