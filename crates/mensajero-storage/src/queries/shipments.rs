// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment import and the per-shipment event lookups status derivation needs.

use mensajero_core::MensajeroError;
use mensajero_core::types::{Dispatch, Reception, Shipment, ShipmentEvents};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::queries::outcome_at;

/// Insert shipments in one transaction, skipping tracking numbers that
/// already exist. Returns how many rows were actually inserted.
pub async fn insert_shipments(
    db: &Database,
    shipments: &[Shipment],
) -> Result<usize, MensajeroError> {
    let shipments = shipments.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO shipments (sender, tracking_number, recipient, address, city)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(tracking_number) DO NOTHING",
                )?;
                for s in &shipments {
                    inserted += stmt.execute(params![
                        s.sender,
                        s.tracking_number,
                        s.recipient,
                        s.address,
                        s.city,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Shipment, dispatch and reception rows for one tracking number, read
/// together on the writer thread so they describe a single moment.
pub async fn shipment_events(
    db: &Database,
    tracking_number: &str,
) -> Result<ShipmentEvents, MensajeroError> {
    let tracking_number = tracking_number.to_string();
    db.connection()
        .call(move |conn| {
            let shipment = conn
                .query_row(
                    "SELECT sender, tracking_number, recipient, address, city
                     FROM shipments WHERE tracking_number = ?1",
                    params![tracking_number],
                    |row| {
                        Ok(Shipment {
                            sender: row.get(0)?,
                            tracking_number: row.get(1)?,
                            recipient: row.get(2)?,
                            address: row.get(3)?,
                            city: row.get(4)?,
                        })
                    },
                )
                .optional()?;

            let dispatch = conn
                .query_row(
                    "SELECT tracking_number, courier, zone, dispatched_at
                     FROM dispatches WHERE tracking_number = ?1",
                    params![tracking_number],
                    |row| {
                        Ok(Dispatch {
                            tracking_number: row.get(0)?,
                            courier: row.get(1)?,
                            zone: row.get(2)?,
                            dispatched_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;

            let reception = conn
                .query_row(
                    "SELECT tracking_number, outcome, reason, received_at
                     FROM receptions WHERE tracking_number = ?1",
                    params![tracking_number],
                    |row| {
                        Ok(Reception {
                            tracking_number: row.get(0)?,
                            outcome: outcome_at(row, 1)?,
                            reason: row.get(2)?,
                            received_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;

            Ok(ShipmentEvents {
                tracking_number,
                shipment,
                dispatch,
                reception,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Events for every imported shipment, ordered by tracking number.
pub async fn list_shipment_events(db: &Database) -> Result<Vec<ShipmentEvents>, MensajeroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT s.sender, s.tracking_number, s.recipient, s.address, s.city,
                        d.courier, d.zone, d.dispatched_at,
                        r.outcome, r.reason, r.received_at
                 FROM shipments s
                 LEFT JOIN dispatches d ON d.tracking_number = s.tracking_number
                 LEFT JOIN receptions r ON r.tracking_number = s.tracking_number
                 ORDER BY s.tracking_number",
            )?;
            let events = stmt
                .query_map([], |row| {
                    let tracking_number: String = row.get(1)?;
                    let dispatch = match row.get::<_, Option<String>>(5)? {
                        Some(courier) => Some(Dispatch {
                            tracking_number: tracking_number.clone(),
                            courier,
                            zone: row.get(6)?,
                            dispatched_at: row.get(7)?,
                        }),
                        None => None,
                    };
                    let reception = match row.get::<_, Option<String>>(8)? {
                        Some(_) => Some(Reception {
                            tracking_number: tracking_number.clone(),
                            outcome: outcome_at(row, 8)?,
                            reason: row.get(9)?,
                            received_at: row.get(10)?,
                        }),
                        None => None,
                    };
                    Ok(ShipmentEvents {
                        tracking_number: tracking_number.clone(),
                        shipment: Some(Shipment {
                            sender: row.get(0)?,
                            tracking_number,
                            recipient: row.get(2)?,
                            address: row.get(3)?,
                            city: row.get(4)?,
                        }),
                        dispatch,
                        reception,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(events)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{make_shipment, setup_db};

    #[tokio::test]
    async fn existing_tracking_numbers_are_skipped() {
        let (db, _dir) = setup_db().await;
        let first = insert_shipments(&db, &[make_shipment("A100"), make_shipment("A101")])
            .await
            .unwrap();
        assert_eq!(first, 2);

        let mut changed = make_shipment("A100");
        changed.recipient = "Otra Persona".to_string();
        let second = insert_shipments(&db, &[changed, make_shipment("A102")])
            .await
            .unwrap();
        assert_eq!(second, 1);

        let events = shipment_events(&db, "A100").await.unwrap();
        assert_eq!(events.shipment.unwrap().recipient, "Luis Pérez");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_tracking_number_has_no_events() {
        let (db, _dir) = setup_db().await;
        let events = shipment_events(&db, "Z999").await.unwrap();
        assert_eq!(events.tracking_number, "Z999");
        assert!(events.shipment.is_none());
        assert!(events.dispatch.is_none());
        assert!(events.reception.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn listing_joins_dispatch_and_reception() {
        let (db, _dir) = setup_db().await;
        insert_shipments(&db, &[make_shipment("B2"), make_shipment("B1")])
            .await
            .unwrap();
        db.connection()
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO dispatches (tracking_number, courier, zone, dispatched_at)
                     VALUES ('B1', 'Ana', 'Norte', '2024-03-01 09:00:00');
                     INSERT INTO receptions (tracking_number, outcome, reason, received_at)
                     VALUES ('B1', 'RETURNED', 'direccion errada', '2024-03-02 10:00:00');",
                )
            })
            .await
            .unwrap();

        let events = list_shipment_events(&db).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tracking_number, "B1");
        assert_eq!(events[0].dispatch.as_ref().unwrap().courier, "Ana");
        let reception = events[0].reception.as_ref().unwrap();
        assert_eq!(reception.outcome, mensajero_core::OutcomeKind::Returned);
        assert_eq!(reception.reason, "direccion errada");
        assert!(events[1].dispatch.is_none());
        assert!(events[1].reception.is_none());
        db.close().await.unwrap();
    }
}
