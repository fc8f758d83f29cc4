// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mensajero_core::MensajeroError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description.
    pub error: String,
    /// Machine-readable error code.
    pub code: &'static str,
    /// Missing columns, for rejected imports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

/// A handler error. User errors are shown verbatim; store and internal
/// failures are logged and answered with a generic message.
#[derive(Debug)]
pub struct ApiError(pub MensajeroError);

impl From<MensajeroError> for ApiError {
    fn from(err: MensajeroError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &MensajeroError) -> StatusCode {
    match err {
        MensajeroError::NotFound { .. } => StatusCode::NOT_FOUND,
        MensajeroError::AlreadyDispatched { .. }
        | MensajeroError::AlreadyReceived { .. }
        | MensajeroError::NotYetDispatched { .. }
        | MensajeroError::DuplicateRegistration { .. } => StatusCode::CONFLICT,
        MensajeroError::InvalidInput(_) | MensajeroError::Sheet { .. } => StatusCode::BAD_REQUEST,
        MensajeroError::ImportSchema { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MensajeroError::Config(_)
        | MensajeroError::Storage { .. }
        | MensajeroError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let error = if self.0.is_user_error() {
            self.0.to_string()
        } else {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        };
        let missing = match &self.0 {
            MensajeroError::ImportSchema { missing, .. } => Some(missing.clone()),
            _ => None,
        };
        (
            status,
            Json(ErrorResponse {
                error,
                code: self.0.code(),
                missing,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(
            status_for(&MensajeroError::shipment_not_found("A1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&MensajeroError::AlreadyDispatched {
                tracking_number: "A1".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&MensajeroError::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MensajeroError::ImportSchema {
                missing: vec!["city".into()],
                required: vec![],
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&MensajeroError::Storage {
                source: "disk full".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let response = ApiError(MensajeroError::Internal("secret path".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
