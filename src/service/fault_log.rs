//! Fault lifecycle and availability transitions.
//!
//! Fault records are an append-mostly history per vehicle: reports
//! prepend, edits touch only title and description, deletes are explicit
//! operator actions. Marking a vehicle unavailable freezes its board
//! assignment but never touches the fault history.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    EventBus, FaultId, FaultRecord, FleetEvent, FleetState, VehicleCatalog, VehicleId,
    VehicleStatus,
};
use crate::error::BoardError;
use crate::persistence::FleetStore;

/// Command surface for fault records and availability status.
#[derive(Debug, Clone)]
pub struct FaultLog {
    catalog: Arc<VehicleCatalog>,
    state: Arc<RwLock<FleetState>>,
    store: Arc<FleetStore>,
    event_bus: EventBus,
}

impl FaultLog {
    /// Creates a new `FaultLog` over the shared fleet state.
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

    /// Records a new fault at the head of the vehicle's history.
    ///
    /// Reporting works regardless of the vehicle's status, so a fault can
    /// be logged ahead of taking the vehicle out of service.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::EmptyFault`] when title and description are both
    ///   blank after trimming.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory record stands.
    pub async fn report_fault(
        &self,
        vehicle_id: &VehicleId,
        title: &str,
        description: &str,
    ) -> Result<FaultRecord, BoardError> {
        let record = validated_record(title, description)?;

        let mut state = self.state.write().await;
        let vs = state
            .vehicle_mut(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        vs.faults.insert(0, record.clone());

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::FaultReported {
            vehicle_id: vehicle_id.clone(),
            fault_id: record.id,
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, fault_id = %record.id, "fault reported");

        save_result?;
        Ok(record)
    }

    /// Rewrites the title and description of an existing fault record.
    ///
    /// The record's id and timestamp are immutable; only the text fields
    /// change.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::FaultNotFound`] when no record carries `fault_id`.
    /// - [`BoardError::EmptyFault`] when the edit would leave both text
    ///   fields blank.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory edit stands.
    pub async fn edit_fault(
        &self,
        vehicle_id: &VehicleId,
        fault_id: FaultId,
        title: &str,
        description: &str,
    ) -> Result<FaultRecord, BoardError> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() && description.is_empty() {
            return Err(BoardError::EmptyFault);
        }

        let mut state = self.state.write().await;
        let vs = state
            .vehicle_mut(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        let record = vs
            .fault_mut(fault_id)
            .ok_or(BoardError::FaultNotFound(*fault_id.as_uuid()))?;
        record.title = title.to_string();
        record.description = description.to_string();
        let record = record.clone();

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::FaultEdited {
            vehicle_id: vehicle_id.clone(),
            fault_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, %fault_id, "fault edited");

        save_result?;
        Ok(record)
    }

    /// Removes a fault record from the vehicle's history.
    ///
    /// Deleting a record does not change the vehicle's status, even when
    /// it was the last one.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::FaultNotFound`] when no record carries `fault_id`,
    ///   including a repeated delete of the same id.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory removal stands.
    pub async fn delete_fault(
        &self,
        vehicle_id: &VehicleId,
        fault_id: FaultId,
    ) -> Result<(), BoardError> {
        let mut state = self.state.write().await;
        let vs = state
            .vehicle_mut(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        let before = vs.faults.len();
        vs.faults.retain(|f| f.id != fault_id);
        if vs.faults.len() == before {
            return Err(BoardError::FaultNotFound(*fault_id.as_uuid()));
        }

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::FaultDeleted {
            vehicle_id: vehicle_id.clone(),
            fault_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, %fault_id, "fault deleted");

        save_result?;
        Ok(())
    }

    /// Takes a vehicle out of service, optionally recording a fresh fault
    /// in the same call.
    ///
    /// With a `(title, description)` payload the fault is recorded first,
    /// then the status flips. Without one the vehicle must already carry
    /// at least one fault; operators cannot pull a vehicle from service
    /// without a documented reason. Marking an already unavailable
    /// vehicle records the payload (if any) but changes nothing else.
    ///
    /// Returns the fault record created from the payload, if any.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::EmptyFault`] when a payload is blank, or when no
    ///   payload is given and the vehicle has no fault on record.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory transition stands.
    pub async fn mark_unavailable(
        &self,
        vehicle_id: &VehicleId,
        fault: Option<(&str, &str)>,
    ) -> Result<Option<FaultRecord>, BoardError> {
        let record = fault
            .map(|(title, description)| validated_record(title, description))
            .transpose()?;

        let mut state = self.state.write().await;
        let vs = state
            .vehicle_mut(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        if record.is_none() && vs.faults.is_empty() {
            return Err(BoardError::EmptyFault);
        }

        let already_down = vs.status == VehicleStatus::Unavailable;
        if already_down && record.is_none() {
            // Nothing to record and nothing to flip.
            return Ok(None);
        }
        if let Some(record) = &record {
            vs.faults.insert(0, record.clone());
        }
        vs.status = VehicleStatus::Unavailable;

        let save_result = self.store.save(&state);
        drop(state);

        if let Some(record) = &record {
            let _ = self.event_bus.publish(FleetEvent::FaultReported {
                vehicle_id: vehicle_id.clone(),
                fault_id: record.id,
                timestamp: Utc::now(),
            });
        }
        if !already_down {
            let _ = self.event_bus.publish(FleetEvent::StatusChanged {
                vehicle_id: vehicle_id.clone(),
                status: VehicleStatus::Unavailable,
                timestamp: Utc::now(),
            });
        }
        tracing::info!(%vehicle_id, "vehicle marked unavailable");

        save_result?;
        Ok(record)
    }

    /// Returns a vehicle to service, unfreezing its board assignment.
    ///
    /// The fault history is left intact; restoring availability is not an
    /// implicit "repaired" statement. Marking an already available
    /// vehicle is a quiet no-op.
    ///
    /// # Errors
    ///
    /// - [`BoardError::VehicleNotFound`] for an id outside the catalog.
    /// - [`BoardError::PersistenceFailure`] when the write-through save
    ///   fails; the in-memory transition stands.
    pub async fn mark_available(&self, vehicle_id: &VehicleId) -> Result<(), BoardError> {
        let mut state = self.state.write().await;
        let vs = state
            .vehicle_mut(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))?;
        if vs.status == VehicleStatus::Available {
            return Ok(());
        }
        vs.status = VehicleStatus::Available;

        let save_result = self.store.save(&state);
        drop(state);

        let _ = self.event_bus.publish(FleetEvent::StatusChanged {
            vehicle_id: vehicle_id.clone(),
            status: VehicleStatus::Available,
            timestamp: Utc::now(),
        });
        tracing::info!(%vehicle_id, "vehicle restored to service");

        save_result?;
        Ok(())
    }

    /// Returns the vehicle's fault history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::VehicleNotFound`] for an id outside the
    /// catalog.
    pub async fn faults_of(&self, vehicle_id: &VehicleId) -> Result<Vec<FaultRecord>, BoardError> {
        let state = self.state.read().await;
        state
            .vehicle(vehicle_id)
            .filter(|_| self.catalog.contains(vehicle_id))
            .map(|vs| vs.faults.clone())
            .ok_or_else(|| BoardError::VehicleNotFound(vehicle_id.to_string()))
    }
}

/// Builds a fault record from trimmed input, rejecting blank payloads.
fn validated_record(title: &str, description: &str) -> Result<FaultRecord, BoardError> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() && description.is_empty() {
        return Err(BoardError::EmptyFault);
    }
    Ok(FaultRecord::new(title, description))
}
