// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mensajero courier tracker.

use thiserror::Error;

/// The primary error type used across the storage trait, the tracker and the
/// request boundary.
#[derive(Debug, Error)]
pub enum MensajeroError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A referenced shipment, courier, zone or customer does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The shipment already has a dispatch record.
    #[error("shipment {tracking_number} was already dispatched")]
    AlreadyDispatched { tracking_number: String },

    /// The shipment already has a reception record.
    #[error("shipment {tracking_number} was already received")]
    AlreadyReceived { tracking_number: String },

    /// A reception was attempted before any dispatch.
    #[error("shipment {tracking_number} has not been dispatched yet")]
    NotYetDispatched { tracking_number: String },

    /// A zone, courier or customer with the same name is already registered.
    #[error("{entity} `{name}` is already registered")]
    DuplicateRegistration { entity: &'static str, name: String },

    /// Malformed number, date or empty required field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An imported sheet lacks required columns.
    #[error("import is missing required columns: {}", missing.join(", "))]
    ImportSchema {
        missing: Vec<String>,
        required: Vec<String>,
    },

    /// Spreadsheet decoding or encoding failure.
    #[error("spreadsheet error: {message}")]
    Sheet { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MensajeroError {
    /// Returns true for errors caused by the caller's input or by the current
    /// state of the records, as opposed to store or process failures.
    ///
    /// User errors are shown verbatim at the request boundary; everything
    /// else surfaces as a generic failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AlreadyDispatched { .. }
                | Self::AlreadyReceived { .. }
                | Self::NotYetDispatched { .. }
                | Self::DuplicateRegistration { .. }
                | Self::InvalidInput(_)
                | Self::ImportSchema { .. }
                | Self::Sheet { .. }
        )
    }

    /// Short machine-readable code used in API error bodies and batch reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Storage { .. } => "storage",
            Self::NotFound { .. } => "not_found",
            Self::AlreadyDispatched { .. } => "already_dispatched",
            Self::AlreadyReceived { .. } => "already_received",
            Self::NotYetDispatched { .. } => "not_yet_dispatched",
            Self::DuplicateRegistration { .. } => "duplicate_registration",
            Self::InvalidInput(_) => "invalid_input",
            Self::ImportSchema { .. } => "import_schema",
            Self::Sheet { .. } => "sheet",
            Self::Internal(_) => "internal",
        }
    }

    pub fn shipment_not_found(tracking_number: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "shipment",
            key: tracking_number.into(),
        }
    }

    pub fn courier_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "courier",
            key: name.into(),
        }
    }
}
