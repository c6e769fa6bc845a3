//! Persistence layer: JSON-document store with catalog merge.
//!
//! Provides [`store::FleetStore`] for durable storage of the fleet
//! aggregate and the schema-tolerant merge that reconciles a stored
//! document with the current [`crate::domain::VehicleCatalog`] on load.

pub mod models;
pub mod store;

pub use store::FleetStore;
