//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{AssignmentBoard, BoardQueryService, FaultLog};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Assignment commands: assign, unassign, occupant and reserve reads.
    pub board: Arc<AssignmentBoard>,
    /// Fault lifecycle and availability transitions.
    pub fault_log: Arc<FaultLog>,
    /// Read-side projections and the reserve-filter preference.
    pub queries: Arc<BoardQueryService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
