//! # fleetboard-gateway
//!
//! REST API and WebSocket gateway for an emergency-medical fleet
//! assignment board.
//!
//! The board tracks a fixed vehicle catalog across duty teams: each team
//! has one slot per vehicle class, every vehicle is either slotted or in
//! the reserve pool, and operators log faults and availability against
//! each vehicle. All mutations flow through the service layer, which
//! writes the aggregate through to a JSON document and broadcasts events
//! to connected dashboards.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── AssignmentBoard / FaultLog / BoardQueryService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── FleetState behind one RwLock (domain/)
//!     │
//!     └── FleetStore JSON document (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
