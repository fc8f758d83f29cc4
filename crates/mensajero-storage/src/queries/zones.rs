// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zone CRUD operations.

use mensajero_core::MensajeroError;
use mensajero_core::types::{Zone, ZoneId};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// Insert a zone. Returns `None` when the name is already taken.
pub async fn insert_zone(
    db: &Database,
    name: &str,
    tariff: f64,
) -> Result<Option<Zone>, MensajeroError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO zones (name, tariff) VALUES (?1, ?2)
                 ON CONFLICT(name) DO NOTHING",
                params![name, tariff],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            Ok(Some(Zone {
                id: ZoneId(conn.last_insert_rowid()),
                name,
                tariff,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All zones ordered by name.
pub async fn list_zones(db: &Database) -> Result<Vec<Zone>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, tariff FROM zones ORDER BY name")?;
            let zones = stmt
                .query_map([], |row| {
                    Ok(Zone {
                        id: ZoneId(row.get(0)?),
                        name: row.get(1)?,
                        tariff: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(zones)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look a zone up by exact name.
pub async fn get_zone_by_name(db: &Database, name: &str) -> Result<Option<Zone>, MensajeroError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let zone = conn
                .query_row(
                    "SELECT id, name, tariff FROM zones WHERE name = ?1",
                    params![name],
                    |row| {
                        Ok(Zone {
                            id: ZoneId(row.get(0)?),
                            name: row.get(1)?,
                            tariff: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(zone)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
