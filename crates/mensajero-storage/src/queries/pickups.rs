// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pickup log.

use mensajero_core::MensajeroError;
use mensajero_core::types::{NewPickup, Pickup};
use rusqlite::params;

use crate::database::Database;

const SELECT_PICKUP: &str = "SELECT p.id, p.tracking_number, p.picked_up_at, p.notes, c.name
     FROM pickups p LEFT JOIN customers c ON c.id = p.customer_id";

fn row_to_pickup(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pickup> {
    Ok(Pickup {
        id: row.get(0)?,
        tracking_number: row.get(1)?,
        picked_up_at: row.get(2)?,
        notes: row.get(3)?,
        customer: row.get(4)?,
    })
}

/// Append a pickup and return it with the customer name resolved.
pub async fn insert_pickup(db: &Database, pickup: &NewPickup) -> Result<Pickup, MensajeroError> {
    let pickup = pickup.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO pickups (tracking_number, picked_up_at, notes, customer_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    pickup.tracking_number,
                    pickup.picked_up_at,
                    pickup.notes,
                    pickup.customer_id.map(|id| id.0),
                ],
            )?;
            conn.query_row(
                &format!("{SELECT_PICKUP} WHERE p.id = ?1"),
                params![conn.last_insert_rowid()],
                row_to_pickup,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All pickups, newest first.
pub async fn list_pickups(db: &Database) -> Result<Vec<Pickup>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_PICKUP} ORDER BY p.picked_up_at DESC, p.id DESC"))?;
            let pickups = stmt
                .query_map([], row_to_pickup)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(pickups)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
