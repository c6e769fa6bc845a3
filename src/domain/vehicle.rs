//! Vehicle and team identity types.
//!
//! [`VehicleId`] and [`TeamId`] are newtype wrappers around `String` so
//! that the two identifier spaces cannot be confused. [`VehicleDefinition`]
//! and [`Team`] are the immutable catalog records fixed at process start.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Class of a fleet vehicle, doubling as the slot class on the board.
///
/// Each duty team exposes exactly one slot per class, and a vehicle may
/// only occupy a slot of its own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Quick-response light car.
    LightCar,
    /// Mobile intensive-care ambulance.
    Ambulance,
}

impl VehicleClass {
    /// Returns the class as its canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LightCar => "LightCar",
            Self::Ambulance => "Ambulance",
        }
    }

    /// Both classes, in the order slots appear on a team card.
    pub const ALL: [Self; 2] = [Self::LightCar, Self::Ambulance];
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LightCar" => Ok(Self::LightCar),
            "Ambulance" => Ok(Self::Ambulance),
            other => Err(format!("unknown vehicle class: {other}")),
        }
    }
}

/// Unique identifier for a fleet vehicle (e.g. `"VLM1"`).
///
/// Drawn from the fixed [`super::VehicleCatalog`]; used as the dictionary
/// key in the fleet aggregate, event discriminator, and WebSocket
/// subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    /// Creates a `VehicleId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unique identifier for a duty team (e.g. `"E1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    /// Creates a `TeamId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TeamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Immutable vehicle identity from the catalog.
///
/// Fixed at process start and never mutated; all mutable per-vehicle
/// data lives in [`super::fleet::VehicleState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleDefinition {
    /// Unique vehicle identifier.
    pub id: VehicleId,
    /// Vehicle class, which also decides the slots it may occupy.
    pub class: VehicleClass,
    /// Human-readable display name (e.g. `"VLM 1"`).
    pub display_name: String,
}

impl VehicleDefinition {
    /// Creates a new catalog definition.
    pub fn new(id: impl Into<VehicleId>, class: VehicleClass, display_name: &str) -> Self {
        Self {
            id: id.into(),
            class,
            display_name: display_name.to_string(),
        }
    }
}

/// A duty team. Configuration constant, not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    /// Unique team identifier.
    pub id: TeamId,
    /// Human-readable team name.
    pub display_name: String,
}

impl Team {
    /// Creates a new team record.
    pub fn new(id: impl Into<TeamId>, display_name: &str) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.to_string(),
        }
    }
}
