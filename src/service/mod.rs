//! Service layer: command and query surfaces over the fleet aggregate.
//!
//! Every service shares the same four handles: the immutable catalog,
//! the locked [`crate::domain::FleetState`], the write-through store,
//! and the event bus. Handlers call services; services own the
//! lock-validate-mutate-persist-publish sequence.

pub mod board;
pub mod fault_log;
pub mod query;

pub use board::AssignmentBoard;
pub use fault_log::FaultLog;
pub use query::{BoardQueryService, BoardView, SlotView, StatusCounts, TeamView, VehicleView};
