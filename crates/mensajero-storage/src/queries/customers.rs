// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer CRUD operations. Names compare case-insensitively through the
//! `name_key` column, which holds the Unicode-lowercased name.

use mensajero_core::MensajeroError;
use mensajero_core::types::{Customer, CustomerId};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: CustomerId(row.get(0)?),
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Uniqueness and lookup key for a customer name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Insert a customer. Returns `None` when the name exists in any casing.
pub async fn insert_customer(
    db: &Database,
    name: &str,
) -> Result<Option<Customer>, MensajeroError> {
    let name = name.to_string();
    let key = name_key(&name);
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO customers (name, name_key) VALUES (?1, ?2)
                 ON CONFLICT(name_key) DO NOTHING",
                params![name, key],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let customer = conn.query_row(
                "SELECT id, name, created_at FROM customers WHERE id = ?1",
                params![conn.last_insert_rowid()],
                row_to_customer,
            )?;
            Ok(Some(customer))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All customers ordered by name.
pub async fn list_customers(db: &Database) -> Result<Vec<Customer>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, created_at FROM customers ORDER BY name")?;
            let customers = stmt
                .query_map([], row_to_customer)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(customers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look a customer up by name, ignoring case.
pub async fn get_customer_by_name(
    db: &Database,
    name: &str,
) -> Result<Option<Customer>, MensajeroError> {
    let key = name_key(name);
    db.connection()
        .call(move |conn| {
            let customer = conn
                .query_row(
                    "SELECT id, name, created_at FROM customers WHERE name_key = ?1",
                    params![key],
                    row_to_customer,
                )
                .optional()?;
            Ok(customer)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
