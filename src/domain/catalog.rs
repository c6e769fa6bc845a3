//! Fixed vehicle and team catalog.
//!
//! [`VehicleCatalog`] is the read-only list of vehicle identities and
//! duty teams, fixed at process start. Catalog order is the stable
//! ordering used for the reserve pool and all list projections.

use super::vehicle::{Team, TeamId, VehicleClass, VehicleDefinition, VehicleId};

/// Read-only lookup over the fixed vehicle and team lists.
///
/// The catalog and the persisted fleet aggregate are kept in lock-step by
/// the merge in [`crate::persistence`]: every catalog id is guaranteed a
/// state entry after `load()`. A lookup miss therefore indicates a caller
/// bug (an id that was never in the catalog), not a data gap.
#[derive(Debug, Clone)]
pub struct VehicleCatalog {
    definitions: Vec<VehicleDefinition>,
    teams: Vec<Team>,
}

impl VehicleCatalog {
    /// Creates a catalog from explicit vehicle and team lists.
    #[must_use]
    pub fn new(definitions: Vec<VehicleDefinition>, teams: Vec<Team>) -> Self {
        Self { definitions, teams }
    }

    /// The standard fleet: four light cars and five ambulances across
    /// three duty teams.
    #[must_use]
    pub fn standard() -> Self {
        let definitions = vec![
            VehicleDefinition::new("VLM1", VehicleClass::LightCar, "VLM 1"),
            VehicleDefinition::new("VLM2", VehicleClass::LightCar, "VLM 2"),
            VehicleDefinition::new("VLM3", VehicleClass::LightCar, "VLM 3"),
            VehicleDefinition::new("VLM4", VehicleClass::LightCar, "VLM 4"),
            VehicleDefinition::new("UMH1", VehicleClass::Ambulance, "UMH 1"),
            VehicleDefinition::new("UMH2", VehicleClass::Ambulance, "UMH 2"),
            VehicleDefinition::new("UMH3", VehicleClass::Ambulance, "UMH 3"),
            VehicleDefinition::new("UMHSJU", VehicleClass::Ambulance, "UMH SJU"),
            VehicleDefinition::new("UMHTIB", VehicleClass::Ambulance, "UMH TIB"),
        ];
        let teams = vec![
            Team::new("E1", "Team 1"),
            Team::new("E2", "Team 2"),
            Team::new("SJU", "Saint Julien"),
        ];
        Self::new(definitions, teams)
    }

    /// Looks up the definition for a vehicle id.
    #[must_use]
    pub fn definition_of(&self, id: &VehicleId) -> Option<&VehicleDefinition> {
        self.definitions.iter().find(|d| &d.id == id)
    }

    /// Returns `true` if the id belongs to the catalog.
    #[must_use]
    pub fn contains(&self, id: &VehicleId) -> bool {
        self.definition_of(id).is_some()
    }

    /// All vehicle definitions in catalog order.
    #[must_use]
    pub fn vehicles(&self) -> &[VehicleDefinition] {
        &self.definitions
    }

    /// All duty teams in display order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Looks up a team by id.
    #[must_use]
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    /// Number of vehicles in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the catalog holds no vehicles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
