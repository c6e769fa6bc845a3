//! Domain layer: catalog, fleet aggregate, and event system.
//!
//! This module contains the server-side domain model including vehicle
//! and team identity, the fixed catalog, the mutable fleet aggregate,
//! and the event bus for broadcasting state changes.

pub mod catalog;
pub mod event_bus;
pub mod fleet;
pub mod fleet_event;
pub mod vehicle;

pub use catalog::VehicleCatalog;
pub use event_bus::EventBus;
pub use fleet::{
    Assignment, FaultId, FaultRecord, FleetState, ReserveFilter, VehicleState, VehicleStatus,
};
pub use fleet_event::FleetEvent;
pub use vehicle::{Team, TeamId, VehicleClass, VehicleDefinition, VehicleId};
