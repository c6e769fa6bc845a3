//! Fault DTOs: report, edit, and list shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::FaultRecord;

/// One fault record as returned by the fault endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct FaultDto {
    /// Fault identifier.
    pub id: uuid::Uuid,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Short fault title.
    pub title: String,
    /// Free-text description.
    pub description: String,
}

impl From<FaultRecord> for FaultDto {
    fn from(record: FaultRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            timestamp: record.timestamp,
            title: record.title,
            description: record.description,
        }
    }
}

/// Request body for `POST /vehicles/:id/faults` and
/// `PATCH /vehicles/:id/faults/:fault_id`.
///
/// At least one field must be non-blank after trimming.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FaultPayload {
    /// Short fault title.
    #[serde(default)]
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Response body for `GET /vehicles/:id/faults`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FaultListResponse {
    /// Fault records, newest first.
    pub data: Vec<FaultDto>,
}
