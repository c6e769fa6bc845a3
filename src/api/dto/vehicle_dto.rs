//! Vehicle DTOs: catalog and state views, availability transitions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fault_dto::FaultDto;
use crate::domain::TeamId;
use crate::service::VehicleView;

/// One vehicle as returned by the vehicle endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleDto {
    /// Vehicle id.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Vehicle class.
    pub class: String,
    /// Availability status.
    pub status: String,
    /// Team occupied, if assigned.
    pub team: Option<String>,
    /// Slot class occupied, if assigned.
    pub slot: Option<String>,
    /// Number of fault records on file.
    pub fault_count: usize,
}

impl From<VehicleView> for VehicleDto {
    fn from(view: VehicleView) -> Self {
        Self {
            id: view.id.to_string(),
            display_name: view.display_name,
            class: view.class.as_str().to_string(),
            status: view.status.as_str().to_string(),
            team: view.team.as_ref().map(TeamId::to_string),
            slot: view.slot.map(|s| s.as_str().to_string()),
            fault_count: view.fault_count,
        }
    }
}

/// Response body for `GET /vehicles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleListResponse {
    /// Every vehicle in catalog order.
    pub data: Vec<VehicleDto>,
}

/// Request body for `POST /vehicles/:id/unavailable`.
///
/// Both fields absent means "no new fault": the vehicle must then
/// already carry at least one fault record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkUnavailableRequest {
    /// Title of a fault to record alongside the transition.
    #[serde(default)]
    pub title: Option<String>,
    /// Description of the fault.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response body for the availability transition endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Vehicle the transition applied to.
    pub vehicle_id: String,
    /// Status after the transition.
    pub status: String,
    /// Fault recorded as part of the transition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultDto>,
}
