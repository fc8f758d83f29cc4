// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mensajero integration tests.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder, shipment_csv};
