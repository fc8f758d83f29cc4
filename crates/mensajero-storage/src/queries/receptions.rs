// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reception records.

use mensajero_core::MensajeroError;
use mensajero_core::types::Reception;
use rusqlite::params;

use crate::database::Database;
use crate::queries::outcome_at;

/// Insert a reception. Returns `false` when the shipment already has one.
pub async fn insert_reception(
    db: &Database,
    reception: &Reception,
) -> Result<bool, MensajeroError> {
    let reception = reception.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO receptions (tracking_number, outcome, reason, received_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(tracking_number) DO NOTHING",
                params![
                    reception.tracking_number,
                    reception.outcome.to_string(),
                    reception.reason,
                    reception.received_at,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All receptions, oldest first.
pub async fn list_receptions(db: &Database) -> Result<Vec<Reception>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT tracking_number, outcome, reason, received_at FROM receptions
                 ORDER BY received_at, tracking_number",
            )?;
            let receptions = stmt
                .query_map([], |row| {
                    Ok(Reception {
                        tracking_number: row.get(0)?,
                        outcome: outcome_at(row, 1)?,
                        reason: row.get(2)?,
                        received_at: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(receptions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
