//! Mutable fleet aggregate: per-vehicle status, assignment, and faults.
//!
//! [`FleetState`] is the single authoritative state graph. It is created
//! by the persistence load at startup, held behind one `RwLock`, and
//! injected into every service; the presentation layer only ever sees
//! view models derived from it.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::VehicleCatalog;
use super::vehicle::{TeamId, VehicleClass, VehicleId};

/// Availability status of a vehicle.
///
/// Status and assignment are orthogonal axes, but an `Unavailable`
/// vehicle's assignment is frozen: `assign` and `unassign` are rejected
/// until an operator restores availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Vehicle is in service and may be moved on the board.
    Available,
    /// Vehicle is out of service; its assignment is frozen.
    Unavailable,
}

impl VehicleStatus {
    /// Returns the status as its canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (team, slot-class) position on the board currently held by a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Team whose slot is occupied.
    pub team: TeamId,
    /// Slot class; always equals the vehicle's own class.
    pub slot: VehicleClass,
}

impl Assignment {
    /// Creates a new assignment.
    #[must_use]
    pub fn new(team: TeamId, slot: VehicleClass) -> Self {
        Self { team, slot }
    }
}

/// Unique identifier for a fault record (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaultId(uuid::Uuid);

impl FaultId {
    /// Creates a new random `FaultId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `FaultId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for FaultId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fault report attached to a vehicle.
///
/// `id` and `timestamp` are stamped at creation and immutable thereafter;
/// only `title` and `description` may be edited. Records are never erased
/// by status changes, only by an explicit operator delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Unique fault identifier (immutable).
    pub id: FaultId,
    /// Creation timestamp (immutable).
    pub timestamp: DateTime<Utc>,
    /// Short fault title.
    pub title: String,
    /// Free-text description.
    pub description: String,
}

impl FaultRecord {
    /// Creates a fault record stamped with a fresh id and the current time.
    ///
    /// Content validation (at least one non-empty field) belongs to the
    /// fault log service, not the record itself.
    #[must_use]
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            id: FaultId::new(),
            timestamp: Utc::now(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Mutable per-vehicle record, one per catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleState {
    /// Availability status.
    pub status: VehicleStatus,
    /// Current slot assignment; `None` means the vehicle is in reserve.
    #[serde(flatten)]
    pub assignment: Option<Assignment>,
    /// Fault history, newest first.
    pub faults: Vec<FaultRecord>,
}

impl VehicleState {
    /// The state every vehicle starts in: available, in reserve, no faults.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            status: VehicleStatus::Available,
            assignment: None,
            faults: Vec::new(),
        }
    }

    /// Returns `true` if the vehicle sits in the reserve pool
    /// (no assignment, regardless of status).
    #[must_use]
    pub fn is_reserve(&self) -> bool {
        self.assignment.is_none()
    }

    /// Looks up a fault record by id.
    #[must_use]
    pub fn fault(&self, id: FaultId) -> Option<&FaultRecord> {
        self.faults.iter().find(|f| f.id == id)
    }

    /// Mutable lookup of a fault record by id.
    pub fn fault_mut(&mut self, id: FaultId) -> Option<&mut FaultRecord> {
        self.faults.iter_mut().find(|f| f.id == id)
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Filter applied to the reserve pool view. The only piece of view state
/// that is itself persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReserveFilter {
    /// Show every reserve vehicle.
    All,
    /// Only light cars.
    LightCar,
    /// Only ambulances.
    Ambulance,
}

impl ReserveFilter {
    /// Returns `true` if a vehicle of the given class passes the filter.
    #[must_use]
    pub const fn matches(&self, class: VehicleClass) -> bool {
        match self {
            Self::All => true,
            Self::LightCar => matches!(class, VehicleClass::LightCar),
            Self::Ambulance => matches!(class, VehicleClass::Ambulance),
        }
    }

    /// Returns the filter as its canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::LightCar => "LightCar",
            Self::Ambulance => "Ambulance",
        }
    }
}

impl Default for ReserveFilter {
    fn default() -> Self {
        Self::All
    }
}

impl fmt::Display for ReserveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReserveFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Self::All),
            "LightCar" => Ok(Self::LightCar),
            "Ambulance" => Ok(Self::Ambulance),
            other => Err(format!("unknown reserve filter: {other}")),
        }
    }
}

/// The persisted fleet aggregate: one [`VehicleState`] per catalog id
/// plus the reserve-filter preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetState {
    /// Per-vehicle state keyed by vehicle id.
    pub vehicles: HashMap<VehicleId, VehicleState>,
    /// Persisted reserve-pool filter preference.
    pub reserve_filter: ReserveFilter,
}

impl FleetState {
    /// Builds the freshly initialized aggregate for a catalog: every
    /// vehicle available, unassigned, with an empty fault history.
    #[must_use]
    pub fn initial(catalog: &VehicleCatalog) -> Self {
        let vehicles = catalog
            .vehicles()
            .iter()
            .map(|def| (def.id.clone(), VehicleState::initial()))
            .collect();
        Self {
            vehicles,
            reserve_filter: ReserveFilter::All,
        }
    }

    /// Looks up the state for a vehicle id.
    #[must_use]
    pub fn vehicle(&self, id: &VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(id)
    }

    /// Mutable lookup of the state for a vehicle id.
    pub fn vehicle_mut(&mut self, id: &VehicleId) -> Option<&mut VehicleState> {
        self.vehicles.get_mut(id)
    }

    /// Returns the id of the vehicle occupying `(team, slot)`, if any,
    /// scanning in catalog order. Slot exclusivity guarantees at most one.
    #[must_use]
    pub fn occupant_of(
        &self,
        catalog: &VehicleCatalog,
        team: &TeamId,
        slot: VehicleClass,
    ) -> Option<VehicleId> {
        catalog
            .vehicles()
            .iter()
            .find(|def| {
                self.vehicle(&def.id)
                    .and_then(|s| s.assignment.as_ref())
                    .is_some_and(|a| &a.team == team && a.slot == slot)
            })
            .map(|def| def.id.clone())
    }
}
