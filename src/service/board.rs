//! Assignment board: the team×slot grid with exclusivity enforcement.
//!
//! Every mutation follows the pattern: acquire the state lock, validate
//! (no partial mutation on failure), mutate, write through to the store,
//! emit events. Displacement of a slot's occupant happens inside the same
//! `assign` call, so no intermediate state with an empty or doubly
//! occupied slot is ever observable.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    Assignment, EventBus, FleetEvent, FleetState, TeamId, VehicleCatalog, VehicleClass, VehicleId,
    VehicleStatus,
};
use crate::error::BoardError;
use crate::persistence::FleetStore;

/// Command surface for moving vehicles between slots and reserve.
#[derive(Debug, Clone)]
pub struct AssignmentBoard {
    catalog: Arc<VehicleCatalog>,
    state: Arc<RwLock<FleetState>>,
    store: Arc<FleetStore>,
    event_bus: EventBus,
}

impl AssignmentBoard {
    /// Creates a new `AssignmentBoard` over the shared fleet state.
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

    /// Returns a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<VehicleCatalog> {
        &self.catalog
    }

    /// Assigns a vehicle to a team slot, atomically displacing the
    /// current occupant to reserve if the slot is taken.
    ///
    /// Returns the displaced vehicle id, if any.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::InvalidRequest`] for an unknown team.
    /// - [`BoardError::TypeMismatch`] when the vehicle class disagrees
    ///   with the slot class.
    /// - [`BoardError::VehicleLocked`] when the vehicle is unavailable.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory assignment stands.
    pub async fn assign(
        &self,
        vehicle_id: &VehicleId,
        team_id: &TeamId,
        slot: VehicleClass,
    ) -> Result<Option<VehicleId>, BoardError> {
        let def = self
            .catalog
            .definition_of(vehicle_id)
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        if self.catalog.team(team_id).is_none() {
            return Err(BoardError::InvalidRequest(format!(
                "unknown team: {team_id}"
            )));
        }
        if def.class != slot {
            return Err(BoardError::TypeMismatch {
                vehicle: vehicle_id.to_string(),
                class: def.class,
                slot,
            });
        }

        let mut state = self.state.write().await;
        let current = state
            .vehicle(vehicle_id)
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        if current.status == VehicleStatus::Unavailable {
            return Err(BoardError::VehicleLocked(vehicle_id.to_string()));
        }

        // Evict the occupant before taking the slot. Incoming always
        // displaces; the request is never rejected for a full slot.
        let displaced = state
            .occupant_of(&self.catalog, team_id, slot)
            .filter(|occupant| occupant != vehicle_id);
        if let Some(occupant) = &displaced
            && let Some(vs) = state.vehicle_mut(occupant)
        {
            vs.assignment = None;
        }
        if let Some(vs) = state.vehicle_mut(vehicle_id) {
            vs.assignment = Some(Assignment::new(team_id.clone(), slot));
        }

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::VehicleAssigned {
            vehicle_id: vehicle_id.clone(),
            team_id: team_id.clone(),
            slot,
            displaced: displaced.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, %team_id, %slot, displaced = ?displaced, "vehicle assigned");

        save_result?;
        Ok(displaced)
    }

    /// Pulls a vehicle back to the reserve pool.
    ///
    /// Unassigning a vehicle already in reserve succeeds without
    /// touching state.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::VehicleLocked`] when the vehicle is unavailable.
    ///   An unavailable vehicle cannot be pulled to reserve either; the
    ///   operator must restore availability first.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory state stands.
    pub async fn unassign(&self, vehicle_id: &VehicleId) -> Result<(), BoardError> {
        if !self.catalog.contains(vehicle_id) {
            return Err(BoardError::VehicleNotFound(vehicle_id.to_string()));
        }

        let mut state = self.state.write().await;
        let current = state
            .vehicle(vehicle_id)
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        if current.status == VehicleStatus::Unavailable {
            return Err(BoardError::VehicleLocked(vehicle_id.to_string()));
        }
        if current.assignment.is_none() {
            return Ok(());
        }

        if let Some(vs) = state.vehicle_mut(vehicle_id) {
            vs.assignment = None;
        }

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::VehicleUnassigned {
            vehicle_id: vehicle_id.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, "vehicle returned to reserve");

        save_result?;
        Ok(())
    }

    /// Returns the vehicle currently occupying `(team, slot)`, if any.
    pub async fn occupant_of(&self, team_id: &TeamId, slot: VehicleClass) -> Option<VehicleId> {
        let state = self.state.read().await;
        state.occupant_of(&self.catalog, team_id, slot)
    }

    /// Returns the reserve pool in catalog order: vehicles without an
    /// assignment, optionally restricted to one class. Status does not
    /// affect membership.
    pub async fn reserve_pool(&self, filter: Option<VehicleClass>) -> Vec<VehicleId> {
        let state = self.state.read().await;
        self.catalog
            .vehicles()
            .iter()
            .filter(|def| filter.is_none_or(|class| def.class == class))
            .filter(|def| {
                state
                    .vehicle(&def.id)
                    .is_some_and(crate::domain::VehicleState::is_reserve)
            })
            .map(|def| def.id.clone())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::FaultLog;

    struct Fixture {
        _dir: tempfile::TempDir,
        board: AssignmentBoard,
        fault_log: FaultLog,
        event_bus: EventBus,
        state: Arc<RwLock<FleetState>>,
        store_path: std::path::PathBuf,
    }

    fn make_services() -> Fixture {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            panic!("tempdir creation failed");
        };
        let store_path = dir.path().join("fleet_state.json");
        let catalog = Arc::new(VehicleCatalog::standard());
        let store = Arc::new(FleetStore::new(store_path.clone()));
        let state = Arc::new(RwLock::new(FleetState::initial(&catalog)));
        let event_bus = EventBus::new(100);

        let board = AssignmentBoard::new(
            Arc::clone(&catalog),
            Arc::clone(&state),
            Arc::clone(&store),
            event_bus.clone(),
        );
        let fault_log = FaultLog::new(catalog, Arc::clone(&state), store, event_bus.clone());
        Fixture {
            _dir: dir,
            board,
            fault_log,
            event_bus,
            state,
            store_path,
        }
    }

    fn vlm1() -> VehicleId {
        VehicleId::from("VLM1")
    }

    fn e1() -> TeamId {
        TeamId::from("E1")
    }

    #[tokio::test]
    async fn assign_places_vehicle_in_slot() {
        let fx = make_services();

        let result = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        let Ok(displaced) = result else {
            panic!("assign failed");
        };
        assert_eq!(displaced, None);
        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            Some(vlm1())
        );
        assert!(!fx.board.reserve_pool(None).await.contains(&vlm1()));
    }

    #[tokio::test]
    async fn assign_unknown_vehicle_fails() {
        let fx = make_services();
        let result = fx
            .board
            .assign(&VehicleId::from("HELO1"), &e1(), VehicleClass::LightCar)
            .await;
        assert!(matches!(result, Err(BoardError::VehicleNotFound(_))));
    }

    #[tokio::test]
    async fn assign_unknown_team_fails() {
        let fx = make_services();
        let result = fx
            .board
            .assign(&vlm1(), &TeamId::from("E9"), VehicleClass::LightCar)
            .await;
        assert!(matches!(result, Err(BoardError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn type_gate_rejects_and_leaves_state_unchanged() {
        let fx = make_services();
        let ambulance = VehicleId::from("UMH1");

        let result = fx
            .board
            .assign(&ambulance, &e1(), VehicleClass::LightCar)
            .await;
        assert!(matches!(result, Err(BoardError::TypeMismatch { .. })));
        assert!(fx.board.reserve_pool(None).await.contains(&ambulance));
        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            None
        );
    }

    #[tokio::test]
    async fn incoming_vehicle_displaces_occupant() {
        let fx = make_services();
        let vlm2 = VehicleId::from("VLM2");

        // Give the first occupant a fault so we can verify history survives.
        let reported = fx.fault_log.report_fault(&vlm1(), "Flat tire", "").await;
        assert!(reported.is_ok());

        let first = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(first.is_ok());

        let second = fx.board.assign(&vlm2, &e1(), VehicleClass::LightCar).await;
        let Ok(displaced) = second else {
            panic!("second assign failed");
        };
        assert_eq!(displaced, Some(vlm1()));

        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            Some(vlm2)
        );
        let reserve = fx.board.reserve_pool(Some(VehicleClass::LightCar)).await;
        assert!(reserve.contains(&vlm1()));

        let faults = fx.fault_log.faults_of(&vlm1()).await;
        assert_eq!(faults.map(|f| f.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn slot_exclusivity_holds_across_assign_sequences() {
        let fx = make_services();
        let moves = [
            ("VLM1", "E1"),
            ("VLM2", "E1"),
            ("VLM2", "E2"),
            ("VLM3", "E2"),
            ("VLM1", "E2"),
            ("VLM1", "E1"),
        ];
        for (vehicle, team) in moves {
            let result = fx
                .board
                .assign(
                    &VehicleId::from(vehicle),
                    &TeamId::from(team),
                    VehicleClass::LightCar,
                )
                .await;
            assert!(result.is_ok(), "assign {vehicle} -> {team}");

            // Inspect raw assignments: every (team, slot) pair at most once.
            let state = fx.state.read().await;
            let mut seen = std::collections::HashSet::new();
            for vs in state.vehicles.values() {
                if let Some(a) = &vs.assignment {
                    assert!(
                        seen.insert((a.team.clone(), a.slot)),
                        "slot ({}, {}) doubly occupied",
                        a.team,
                        a.slot
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn reassigning_same_vehicle_moves_it_between_slots() {
        let fx = make_services();
        let e2 = TeamId::from("E2");

        let first = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(first.is_ok());
        let second = fx.board.assign(&vlm1(), &e2, VehicleClass::LightCar).await;
        assert!(second.is_ok());

        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            None
        );
        assert_eq!(
            fx.board.occupant_of(&e2, VehicleClass::LightCar).await,
            Some(vlm1())
        );
    }

    #[tokio::test]
    async fn lock_gate_blocks_assignment_mutation() {
        let fx = make_services();

        let assigned = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(assigned.is_ok());
        let down = fx
            .fault_log
            .mark_unavailable(&vlm1(), Some(("Flat tire", "")))
            .await;
        assert!(down.is_ok());

        let assign = fx
            .board
            .assign(&vlm1(), &TeamId::from("E2"), VehicleClass::LightCar)
            .await;
        assert!(matches!(assign, Err(BoardError::VehicleLocked(_))));
        let unassign = fx.board.unassign(&vlm1()).await;
        assert!(matches!(unassign, Err(BoardError::VehicleLocked(_))));

        // Assignment frozen exactly where it was.
        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            Some(vlm1())
        );
    }

    #[tokio::test]
    async fn unassign_returns_vehicle_to_reserve() {
        let fx = make_services();

        let assigned = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(assigned.is_ok());
        let unassigned = fx.board.unassign(&vlm1()).await;
        assert!(unassigned.is_ok());

        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            None
        );
        assert!(
            fx.board
                .reserve_pool(Some(VehicleClass::LightCar))
                .await
                .contains(&vlm1())
        );
    }

    #[tokio::test]
    async fn unassign_in_reserve_is_a_quiet_noop() {
        let fx = make_services();
        let mut rx = fx.event_bus.subscribe();

        let result = fx.board.unassign(&vlm1()).await;
        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reserve_pool_is_catalog_ordered_and_filterable() {
        let fx = make_services();

        let assigned = fx
            .board
            .assign(&VehicleId::from("UMH2"), &e1(), VehicleClass::Ambulance)
            .await;
        assert!(assigned.is_ok());

        let light = fx.board.reserve_pool(Some(VehicleClass::LightCar)).await;
        let ids: Vec<&str> = light.iter().map(VehicleId::as_str).collect();
        assert_eq!(ids, ["VLM1", "VLM2", "VLM3", "VLM4"]);

        let ambulances = fx.board.reserve_pool(Some(VehicleClass::Ambulance)).await;
        let ids: Vec<&str> = ambulances.iter().map(VehicleId::as_str).collect();
        assert_eq!(ids, ["UMH1", "UMH3", "UMHSJU", "UMHTIB"]);
    }

    #[tokio::test]
    async fn mutations_write_through_to_the_store() {
        let fx = make_services();

        let assigned = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(assigned.is_ok());

        // A fresh store over the same path sees the assignment.
        let catalog = VehicleCatalog::standard();
        let reloaded = FleetStore::new(fx.store_path.clone()).load(&catalog);
        let occupant = reloaded.occupant_of(&catalog, &e1(), VehicleClass::LightCar);
        assert_eq!(occupant, Some(vlm1()));
    }

    #[tokio::test]
    async fn assign_publishes_event_with_displacement() {
        let fx = make_services();
        let mut rx = fx.event_bus.subscribe();

        let first = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(first.is_ok());
        let second = fx
            .board
            .assign(&VehicleId::from("VLM2"), &e1(), VehicleClass::LightCar)
            .await;
        assert!(second.is_ok());

        let first_event = rx.recv().await;
        let Ok(first_event) = first_event else {
            panic!("expected first event");
        };
        assert_eq!(first_event.event_type_str(), "vehicle_assigned");

        let second_event = rx.recv().await;
        let Ok(FleetEvent::VehicleAssigned { displaced, .. }) = second_event else {
            panic!("expected second assignment event");
        };
        assert_eq!(displaced, Some(vlm1()));
    }

    /// The operational cycle: slot a car, report a fault and lock it,
    /// verify it stays slotted but immovable, then release and recover.
    #[tokio::test]
    async fn assign_lock_release_cycle() {
        let fx = make_services();
        let e2 = TeamId::from("E2");

        let assigned = fx.board.assign(&vlm1(), &e1(), VehicleClass::LightCar).await;
        assert!(assigned.is_ok());
        assert_eq!(
            fx.board.occupant_of(&e1(), VehicleClass::LightCar).await,
            Some(vlm1())
        );

        let reported = fx.fault_log.report_fault(&vlm1(), "Flat tire", "").await;
        assert!(reported.is_ok());
        let down = fx.fault_log.mark_unavailable(&vlm1(), None).await;
        assert!(down.is_ok());

        let moved = fx.board.assign(&vlm1(), &e2, VehicleClass::LightCar).await;
        assert!(matches!(moved, Err(BoardError::VehicleLocked(_))));

        // Still slotted, just unavailable. Not in reserve.
        assert!(
            !fx.board
                .reserve_pool(Some(VehicleClass::LightCar))
                .await
                .contains(&vlm1())
        );

        let up = fx.fault_log.mark_available(&vlm1()).await;
        assert!(up.is_ok());
        let unassigned = fx.board.unassign(&vlm1()).await;
        assert!(unassigned.is_ok());
        assert!(
            fx.board
                .reserve_pool(Some(VehicleClass::LightCar))
                .await
                .contains(&vlm1())
        );
    }
}
