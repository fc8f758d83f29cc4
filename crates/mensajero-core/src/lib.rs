// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mensajero courier tracker.
//!
//! Provides the error type, the domain types shared by every crate, and the
//! storage adapter trait the tracker is written against.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MensajeroError;
pub use types::{HealthStatus, OutcomeKind, ShipmentState};

pub use traits::{PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn storage_trait_is_object_safe() {
        fn _assert_object(_: &dyn StorageAdapter) {}
        fn _assert_plugin<T: PluginAdapter>() {}
    }
}
