//! Domain events reflecting fleet state mutations.
//!
//! Every successful mutation emits a [`FleetEvent`] through the
//! [`super::EventBus`] so connected dashboards can re-render. Events are
//! broadcast to WebSocket subscribers filtered by vehicle id.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::fleet::{FaultId, ReserveFilter, VehicleStatus};
use super::vehicle::{TeamId, VehicleClass, VehicleId};

/// Domain event emitted after every successful state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FleetEvent {
    /// A vehicle took a slot, possibly displacing the previous occupant.
    VehicleAssigned {
        /// Vehicle that took the slot.
        vehicle_id: VehicleId,
        /// Team whose slot was taken.
        team_id: TeamId,
        /// Slot class.
        slot: VehicleClass,
        /// Previous occupant moved to reserve, if any.
        displaced: Option<VehicleId>,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A vehicle was pulled back to the reserve pool.
    VehicleUnassigned {
        /// Vehicle that returned to reserve.
        vehicle_id: VehicleId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A vehicle's availability status flipped.
    StatusChanged {
        /// Vehicle whose status changed.
        vehicle_id: VehicleId,
        /// New status.
        status: VehicleStatus,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A fault record was added to a vehicle's history.
    FaultReported {
        /// Vehicle the fault belongs to.
        vehicle_id: VehicleId,
        /// Identifier of the new fault record.
        fault_id: FaultId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A fault record's title or description was edited.
    FaultEdited {
        /// Vehicle the fault belongs to.
        vehicle_id: VehicleId,
        /// Identifier of the edited fault record.
        fault_id: FaultId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A fault record was deleted by operator action.
    FaultDeleted {
        /// Vehicle the fault belonged to.
        vehicle_id: VehicleId,
        /// Identifier of the removed fault record.
        fault_id: FaultId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The persisted reserve-filter preference changed.
    ReserveFilterChanged {
        /// New filter value.
        filter: ReserveFilter,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl FleetEvent {
    /// Returns the vehicle this event is scoped to, or `None` for
    /// fleet-wide events (which are delivered to every subscriber).
    #[must_use]
    pub fn vehicle_id(&self) -> Option<&VehicleId> {
        match self {
            Self::VehicleAssigned { vehicle_id, .. }
            | Self::VehicleUnassigned { vehicle_id, .. }
            | Self::StatusChanged { vehicle_id, .. }
            | Self::FaultReported { vehicle_id, .. }
            | Self::FaultEdited { vehicle_id, .. }
            | Self::FaultDeleted { vehicle_id, .. } => Some(vehicle_id),
            Self::ReserveFilterChanged { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::VehicleAssigned { .. } => "vehicle_assigned",
            Self::VehicleUnassigned { .. } => "vehicle_unassigned",
            Self::StatusChanged { .. } => "status_changed",
            Self::FaultReported { .. } => "fault_reported",
            Self::FaultEdited { .. } => "fault_edited",
            Self::FaultDeleted { .. } => "fault_deleted",
            Self::ReserveFilterChanged { .. } => "reserve_filter_changed",
        }
    }
}
