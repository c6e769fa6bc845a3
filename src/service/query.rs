//! Read-side projections of the fleet aggregate.
//!
//! Builds the view models the dashboard renders: the team grid, the
//! filtered reserve pool, and the status tallies. The only mutation that
//! lives here is the persisted reserve-filter preference, which is view
//! state rather than fleet state.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::domain::{
    EventBus, FleetEvent, FleetState, ReserveFilter, TeamId, VehicleCatalog, VehicleClass,
    VehicleDefinition, VehicleId, VehicleState, VehicleStatus,
};
use crate::error::BoardError;
use crate::persistence::FleetStore;

/// Fleet-wide status tallies.
///
/// `reserve` counts unassigned vehicles regardless of status, so it
/// overlaps with the other two: the three numbers do not sum to the
/// catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Vehicles in service.
    pub available: usize,
    /// Vehicles out of service.
    pub unavailable: usize,
    /// Vehicles without a slot assignment.
    pub reserve: usize,
}

/// One vehicle as rendered on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    /// Vehicle id.
    pub id: VehicleId,
    /// Human-readable name from the catalog.
    pub display_name: String,
    /// Vehicle class.
    pub class: VehicleClass,
    /// Availability status.
    pub status: VehicleStatus,
    /// Team occupied, if assigned.
    pub team: Option<TeamId>,
    /// Slot class occupied, if assigned.
    pub slot: Option<VehicleClass>,
    /// Number of fault records on file.
    pub fault_count: usize,
}

impl VehicleView {
    fn build(def: &VehicleDefinition, vs: &VehicleState) -> Self {
        Self {
            id: def.id.clone(),
            display_name: def.display_name.clone(),
            class: def.class,
            status: vs.status,
            team: vs.assignment.as_ref().map(|a| a.team.clone()),
            slot: vs.assignment.as_ref().map(|a| a.slot),
            fault_count: vs.faults.len(),
        }
    }
}

/// One slot in a team's row.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    /// Slot class.
    pub slot: VehicleClass,
    /// Occupying vehicle, if any.
    pub occupant: Option<VehicleView>,
}

/// One team row: a slot per vehicle class.
#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    /// Team id.
    pub team_id: TeamId,
    /// Human-readable team name.
    pub display_name: String,
    /// Slots in class order.
    pub slots: Vec<SlotView>,
}

/// The full dashboard projection, rendered in one read pass.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    /// Team rows in catalog order.
    pub teams: Vec<TeamView>,
    /// Reserve pool after applying the persisted filter, catalog order.
    pub reserve: Vec<VehicleView>,
    /// The persisted reserve-filter preference.
    pub reserve_filter: ReserveFilter,
    /// Fleet-wide tallies.
    pub counts: StatusCounts,
}

/// Read-side query surface plus the reserve-filter preference.
#[derive(Debug, Clone)]
pub struct BoardQueryService {
    catalog: Arc<VehicleCatalog>,
    state: Arc<RwLock<FleetState>>,
    store: Arc<FleetStore>,
    event_bus: EventBus,
}

impl BoardQueryService {
    /// Creates a new `BoardQueryService` over the shared fleet state.
    #[must_use]
    pub fn new(
        catalog: Arc<VehicleCatalog>,
        state: Arc<RwLock<FleetState>>,
        store: Arc<FleetStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            catalog,
            state,
            store,
            event_bus,
        }
    }

    /// Computes the fleet-wide status tallies.
    pub async fn counts(&self) -> StatusCounts {
        let state = self.state.read().await;
        counts_of(&self.catalog, &state)
    }

    /// Returns the persisted reserve-filter preference.
    pub async fn reserve_filter(&self) -> ReserveFilter {
        self.state.read().await.reserve_filter
    }

    /// Persists a new reserve-filter preference.
    ///
    /// Setting the value it already holds is a quiet no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PersistenceFailure`] when the write-through
    /// save fails; the in-memory preference stands.
    pub async fn set_reserve_filter(&self, filter: ReserveFilter) -> Result<(), BoardError> {
        let mut state = self.state.write().await;
        if state.reserve_filter == filter {
            return Ok(());
        }
        state.reserve_filter = filter;

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::ReserveFilterChanged {
            filter,
            timestamp: Utc::now(),
        });
        tracing::info!(%filter, "reserve filter changed");

        save_result?;
        Ok(())
    }

    /// Renders every vehicle in catalog order.
    pub async fn vehicle_views(&self) -> Vec<VehicleView> {
        let state = self.state.read().await;
        self.catalog
            .vehicles()
            .iter()
            .filter_map(|def| {
                state
                    .vehicle(&def.id)
                    .map(|vs| VehicleView::build(def, vs))
            })
            .collect()
    }

    /// Renders a single vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::VehicleNotFound`] for an id outside the
    /// catalog.
    pub async fn vehicle_view(&self, vehicle_id: &VehicleId) -> Result<VehicleView, BoardError> {
        let state = self.state.read().await;
        let def = self
            .catalog
            .definition_of(vehicle_id)
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        let vs = state
            .vehicle(vehicle_id)
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        Ok(VehicleView::build(def, vs))
    }

    /// Renders the full dashboard in a single consistent read.
    pub async fn board_view(&self) -> BoardView {
        let state = self.state.read().await;

        let teams = self
            .catalog
            .teams()
            .iter()
            .map(|team| TeamView {
                team_id: team.id.clone(),
                display_name: team.display_name.clone(),
                slots: VehicleClass::ALL
                    .into_iter()
                    .map(|slot| SlotView {
                        slot,
                        occupant: state
                            .occupant_of(&self.catalog, &team.id, slot)
                            .and_then(|id| {
                                self.catalog.definition_of(&id).and_then(|def| {
                                    state.vehicle(&id).map(|vs| VehicleView::build(def, vs))
                                })
                            }),
                    })
                    .collect(),
            })
            .collect();

        let reserve = self
            .catalog
            .vehicles()
            .iter()
            .filter(|def| state.reserve_filter.matches(def.class))
            .filter_map(|def| {
                state
                    .vehicle(&def.id)
                    .filter(|vs| vs.is_reserve())
                    .map(|vs| VehicleView::build(def, vs))
            })
            .collect();

        BoardView {
            teams,
            reserve,
            reserve_filter: state.reserve_filter,
            counts: counts_of(&self.catalog, &state),
        }
    }
}

fn counts_of(catalog: &VehicleCatalog, state: &FleetState) -> StatusCounts {
    let mut counts = StatusCounts {
        available: 0,
        unavailable: 0,
        reserve: 0,
    };
    for def in catalog.vehicles() {
        let Some(vs) = state.vehicle(&def.id) else {
            continue;
        };
        match vs.status {
            VehicleStatus::Available => counts.available += 1,
            VehicleStatus::Unavailable => counts.unavailable += 1,
        }
        if vs.is_reserve() {
            counts.reserve += 1;
        }
    }
    counts
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::{AssignmentBoard, FaultLog};

    struct Fixture {
        _dir: tempfile::TempDir,
        board: AssignmentBoard,
        fault_log: FaultLog,
        queries: BoardQueryService,
        event_bus: EventBus,
    }

    fn make_services() -> Fixture {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            panic!("tempdir creation failed");
        };
        let catalog = Arc::new(VehicleCatalog::standard());
        let store = Arc::new(FleetStore::new(dir.path().join("fleet_state.json")));
        let state = Arc::new(RwLock::new(FleetState::initial(&catalog)));
        let event_bus = EventBus::new(100);

        let board = AssignmentBoard::new(
            Arc::clone(&catalog),
            Arc::clone(&state),
            Arc::clone(&store),
            event_bus.clone(),
        );
        let fault_log = FaultLog::new(
            Arc::clone(&catalog),
            Arc::clone(&state),
            Arc::clone(&store),
            event_bus.clone(),
        );
        let queries = BoardQueryService::new(catalog, state, store, event_bus.clone());
        Fixture {
            _dir: dir,
            board,
            fault_log,
            queries,
            event_bus,
        }
    }

    #[tokio::test]
    async fn initial_counts_cover_the_whole_catalog() {
        let fx = make_services();
        let counts = fx.queries.counts().await;
        assert_eq!(counts.available, 9);
        assert_eq!(counts.unavailable, 0);
        assert_eq!(counts.reserve, 9);
    }

    #[tokio::test]
    async fn counts_track_status_and_assignment_independently() {
        let fx = make_services();
        let assigned = fx
            .board
            .assign(
                &VehicleId::from("VLM1"),
                &TeamId::from("E1"),
                VehicleClass::LightCar,
            )
            .await;
        assert!(assigned.is_ok());
        let down = fx
            .fault_log
            .mark_unavailable(&VehicleId::from("VLM1"), Some(("Flat tire", "")))
            .await;
        assert!(down.is_ok());
        let down = fx
            .fault_log
            .mark_unavailable(&VehicleId::from("UMH1"), Some(("Battery", "")))
            .await;
        assert!(down.is_ok());

        let counts = fx.queries.counts().await;
        assert_eq!(counts.available, 7);
        assert_eq!(counts.unavailable, 2);
        // UMH1 is unavailable yet still in reserve.
        assert_eq!(counts.reserve, 8);
    }

    #[tokio::test]
    async fn board_view_places_occupants_and_filters_reserve() {
        let fx = make_services();
        let assigned = fx
            .board
            .assign(
                &VehicleId::from("UMH2"),
                &TeamId::from("E2"),
                VehicleClass::Ambulance,
            )
            .await;
        assert!(assigned.is_ok());
        let filtered = fx
            .queries
            .set_reserve_filter(ReserveFilter::Ambulance)
            .await;
        assert!(filtered.is_ok());

        let view = fx.queries.board_view().await;
        assert_eq!(view.teams.len(), 3);
        let e2 = view.teams.iter().find(|t| t.team_id.as_str() == "E2");
        let Some(e2) = e2 else {
            panic!("E2 row missing");
        };
        let ambulance_slot = e2.slots.iter().find(|s| s.slot == VehicleClass::Ambulance);
        let occupant = ambulance_slot.and_then(|s| s.occupant.as_ref());
        assert_eq!(occupant.map(|v| v.id.as_str()), Some("UMH2"));

        let reserve_ids: Vec<&str> = view.reserve.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(reserve_ids, ["UMH1", "UMH3", "UMHSJU", "UMHTIB"]);
        assert_eq!(view.reserve_filter, ReserveFilter::Ambulance);
    }

    #[tokio::test]
    async fn vehicle_view_carries_assignment_and_fault_count() {
        let fx = make_services();
        let id = VehicleId::from("VLM2");
        let assigned = fx
            .board
            .assign(&id, &TeamId::from("E1"), VehicleClass::LightCar)
            .await;
        assert!(assigned.is_ok());
        let reported = fx.fault_log.report_fault(&id, "Wiper", "").await;
        assert!(reported.is_ok());

        let view = fx.queries.vehicle_view(&id).await;
        let Ok(view) = view else {
            panic!("vehicle view failed");
        };
        assert_eq!(view.display_name, "VLM 2");
        assert_eq!(view.team.as_ref().map(TeamId::as_str), Some("E1"));
        assert_eq!(view.slot, Some(VehicleClass::LightCar));
        assert_eq!(view.fault_count, 1);

        let unknown = fx.queries.vehicle_view(&VehicleId::from("HELO1")).await;
        assert!(matches!(unknown, Err(BoardError::VehicleNotFound(_))));
    }

    #[tokio::test]
    async fn setting_same_filter_is_a_quiet_noop() {
        let fx = make_services();
        let mut rx = fx.event_bus.subscribe();

        let result = fx.queries.set_reserve_filter(ReserveFilter::All).await;
        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());

        let result = fx
            .queries
            .set_reserve_filter(ReserveFilter::LightCar)
            .await;
        assert!(result.is_ok());
        let event = rx.try_recv();
        let Ok(FleetEvent::ReserveFilterChanged { filter, .. }) = event else {
            panic!("expected filter event");
        };
        assert_eq!(filter, ReserveFilter::LightCar);
        assert_eq!(fx.queries.reserve_filter().await, ReserveFilter::LightCar);
    }
}
