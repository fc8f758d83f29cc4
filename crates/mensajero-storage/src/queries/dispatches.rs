// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch records and the courier/date filtered reads settlement uses.

use mensajero_core::MensajeroError;
use mensajero_core::types::{Dispatch, DispatchFilter};
use rusqlite::params;

use crate::database::Database;

/// Insert a dispatch. Returns `false` when the shipment was already dispatched.
pub async fn insert_dispatch(db: &Database, dispatch: &Dispatch) -> Result<bool, MensajeroError> {
    let dispatch = dispatch.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO dispatches (tracking_number, courier, zone, dispatched_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(tracking_number) DO NOTHING",
                params![
                    dispatch.tracking_number,
                    dispatch.courier,
                    dispatch.zone,
                    dispatch.dispatched_at,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// WHERE clause and positional arguments for a filter.
///
/// Date bounds compare the calendar date of `dispatched_at`, so both ends
/// are inclusive whole days.
fn filter_clause(filter: &DispatchFilter) -> (String, Vec<String>) {
    let mut clause = String::from("WHERE 1 = 1");
    let mut args = Vec::new();
    if let Some(courier) = &filter.courier {
        args.push(courier.clone());
        clause.push_str(&format!(" AND courier = ?{}", args.len()));
    }
    if let Some(from) = &filter.date_from {
        args.push(from.clone());
        clause.push_str(&format!(" AND date(dispatched_at) >= ?{}", args.len()));
    }
    if let Some(to) = &filter.date_to {
        args.push(to.clone());
        clause.push_str(&format!(" AND date(dispatched_at) <= ?{}", args.len()));
    }
    (clause, args)
}

/// Dispatches matching `filter`, oldest first.
pub async fn list_dispatches(
    db: &Database,
    filter: &DispatchFilter,
) -> Result<Vec<Dispatch>, MensajeroError> {
    let (clause, args) = filter_clause(filter);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT tracking_number, courier, zone, dispatched_at FROM dispatches
                 {clause} ORDER BY dispatched_at, tracking_number"
            ))?;
            let dispatches = stmt
                .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                    Ok(Dispatch {
                        tracking_number: row.get(0)?,
                        courier: row.get(1)?,
                        zone: row.get(2)?,
                        dispatched_at: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(dispatches)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of dispatches matching `filter`.
pub async fn count_dispatches(
    db: &Database,
    filter: &DispatchFilter,
) -> Result<i64, MensajeroError> {
    let (clause, args) = filter_clause(filter);
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT COUNT(*) FROM dispatches {clause}"),
                rusqlite::params_from_iter(args.iter()),
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
