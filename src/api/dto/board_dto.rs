//! Assignment-board DTOs: assignments, reserve pool, counts, preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::StatusCounts;

/// Request body for `POST /assignments`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    /// Vehicle to place on the board.
    pub vehicle_id: String,
    /// Target team.
    pub team_id: String,
    /// Target slot class (`"LightCar"` or `"Ambulance"`).
    pub slot: String,
}

/// Response body for `POST /assignments`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignResponse {
    /// Vehicle that took the slot.
    pub vehicle_id: String,
    /// Team whose slot was taken.
    pub team_id: String,
    /// Slot class.
    pub slot: String,
    /// Previous occupant moved to reserve, if any.
    pub displaced: Option<String>,
    /// Server timestamp of the assignment.
    pub assigned_at: DateTime<Utc>,
}

/// Response body for `GET /teams/:team_id/slots/:slot`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OccupantResponse {
    /// Team queried.
    pub team_id: String,
    /// Slot class queried.
    pub slot: String,
    /// Vehicle currently in the slot, if any.
    pub occupant: Option<String>,
}

/// Query parameters for `GET /reserve`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReserveQuery {
    /// Restrict the pool to one vehicle class.
    #[serde(default)]
    pub class: Option<String>,
}

/// Response body for `GET /reserve`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReserveResponse {
    /// Reserve vehicle ids in catalog order.
    pub vehicle_ids: Vec<String>,
}

/// Response body for `GET /counts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountsResponse {
    /// Vehicles in service.
    pub available: usize,
    /// Vehicles out of service.
    pub unavailable: usize,
    /// Vehicles without a slot assignment.
    pub reserve: usize,
}

impl From<StatusCounts> for CountsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            available: counts.available,
            unavailable: counts.unavailable,
            reserve: counts.reserve,
        }
    }
}

/// Reserve-filter preference, both read and write shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReserveFilterDto {
    /// Filter value (`"All"`, `"LightCar"`, or `"Ambulance"`).
    pub filter: String,
}
