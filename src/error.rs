//! Board error types with HTTP status code mapping.
//!
//! [`BoardError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Every variant is recoverable at the call site: validation failures are
//! no-ops on the in-memory fleet state.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::VehicleClass;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2003,
///     "message": "vehicle VLM1 is unavailable and cannot be moved",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`BoardError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Board-Specific  | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Vehicle id not present in the catalog.
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Fault record not present on the vehicle.
    #[error("fault not found: {0}")]
    FaultNotFound(uuid::Uuid),

    /// Vehicle class disagrees with the target slot class.
    #[error("vehicle {vehicle} is a {class} and cannot take a {slot} slot")]
    TypeMismatch {
        /// Vehicle that was being assigned.
        vehicle: String,
        /// The vehicle's actual class.
        class: VehicleClass,
        /// The slot class that was requested.
        slot: VehicleClass,
    },

    /// Assignment mutation attempted while the vehicle is unavailable.
    #[error("vehicle {0} is unavailable and cannot be moved")]
    VehicleLocked(String),

    /// Fault report with neither title nor description after trimming.
    #[error("fault report requires a title or a description")]
    EmptyFault,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage read/write failure. The in-memory state stays
    /// authoritative for the rest of the session.
    #[error("persistence error: {0}")]
    PersistenceFailure(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BoardError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EmptyFault => 1002,
            Self::VehicleNotFound(_) => 2001,
            Self::FaultNotFound(_) => 2002,
            Self::VehicleLocked(_) => 2003,
            Self::Internal(_) => 3000,
            Self::PersistenceFailure(_) => 3001,
            Self::TypeMismatch { .. } => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::EmptyFault => StatusCode::BAD_REQUEST,
            Self::VehicleNotFound(_) | Self::FaultNotFound(_) => StatusCode::NOT_FOUND,
            Self::VehicleLocked(_) => StatusCode::CONFLICT,
            Self::TypeMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
