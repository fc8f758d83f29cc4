// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier CRUD operations.

use mensajero_core::MensajeroError;
use mensajero_core::types::{Courier, CourierId, ZoneId};
use rusqlite::params;

use crate::database::Database;

/// Insert a courier bound to `zone_id`. Returns `None` when the name is taken.
pub async fn insert_courier(
    db: &Database,
    name: &str,
    zone_id: ZoneId,
) -> Result<Option<Courier>, MensajeroError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO couriers (name, zone_id) VALUES (?1, ?2)
                 ON CONFLICT(name) DO NOTHING",
                params![name, zone_id.0],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            Ok(Some(Courier {
                id: CourierId(conn.last_insert_rowid()),
                name,
                zone_id,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All couriers ordered by name.
pub async fn list_couriers(db: &Database) -> Result<Vec<Courier>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, zone_id FROM couriers ORDER BY name")?;
            let couriers = stmt
                .query_map([], |row| {
                    Ok(Courier {
                        id: CourierId(row.get(0)?),
                        name: row.get(1)?,
                        zone_id: ZoneId(row.get(2)?),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(couriers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
