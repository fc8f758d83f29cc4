// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure lifecycle rules over the three event lookups.
//!
//! Precedence: no shipment row means `MISSING` whatever else exists; then a
//! reception decides the terminal state; then a dispatch means `DISPATCHED`;
//! otherwise the shipment is `IN_VERIFICATION`. Pickups play no part.

use mensajero_core::types::{OutcomeKind, ShipmentEvents, ShipmentState, ShipmentStatus};
use mensajero_core::MensajeroError;

/// Display status for a tracking number.
pub fn derive_status(events: ShipmentEvents) -> ShipmentStatus {
    let ShipmentEvents {
        tracking_number,
        shipment,
        dispatch,
        reception,
    } = events;

    let Some(shipment) = shipment else {
        return ShipmentStatus {
            tracking_number,
            state: ShipmentState::Missing,
            shipment: None,
            courier: None,
            zone: None,
            dispatched_at: None,
            reason: None,
            received_at: None,
        };
    };

    let state = match (&reception, &dispatch) {
        (Some(r), _) => ShipmentState::from(r.outcome),
        (None, Some(_)) => ShipmentState::Dispatched,
        (None, None) => ShipmentState::InVerification,
    };
    let (courier, zone, dispatched_at) = match dispatch {
        Some(d) => (Some(d.courier), Some(d.zone), Some(d.dispatched_at)),
        None => (None, None, None),
    };
    let (reason, received_at) = match reception {
        Some(r) if r.outcome == OutcomeKind::Returned => (Some(r.reason), Some(r.received_at)),
        Some(r) => (None, Some(r.received_at)),
        None => (None, None),
    };

    ShipmentStatus {
        tracking_number,
        state,
        shipment: Some(shipment),
        courier,
        zone,
        dispatched_at,
        reason,
        received_at,
    }
}

/// Whether a dispatch may be recorded.
pub fn check_dispatch(events: &ShipmentEvents) -> Result<(), MensajeroError> {
    if events.shipment.is_none() {
        return Err(MensajeroError::shipment_not_found(&events.tracking_number));
    }
    if events.reception.is_some() {
        return Err(MensajeroError::AlreadyReceived {
            tracking_number: events.tracking_number.clone(),
        });
    }
    if events.dispatch.is_some() {
        return Err(MensajeroError::AlreadyDispatched {
            tracking_number: events.tracking_number.clone(),
        });
    }
    Ok(())
}

/// Whether a reception may be recorded.
pub fn check_reception(events: &ShipmentEvents) -> Result<(), MensajeroError> {
    if events.shipment.is_none() {
        return Err(MensajeroError::shipment_not_found(&events.tracking_number));
    }
    if events.dispatch.is_none() {
        return Err(MensajeroError::NotYetDispatched {
            tracking_number: events.tracking_number.clone(),
        });
    }
    if events.reception.is_some() {
        return Err(MensajeroError::AlreadyReceived {
            tracking_number: events.tracking_number.clone(),
        });
    }
    Ok(())
}
