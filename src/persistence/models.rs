//! Schema-tolerant merge of the stored aggregate against the catalog.
//!
//! The stored document may come from an earlier schema version, so every
//! field is coerced individually: anything missing or malformed becomes a
//! default-value gap, never a parse error. The merge is additive: a
//! catalog id absent from storage is inserted with the default state, and
//! an assignment is only accepted when it is fully consistent with the
//! catalog (a mismatched slot class is dropped, never repaired by
//! guessing).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::{
    Assignment, FaultId, FaultRecord, FleetState, ReserveFilter, TeamId, VehicleCatalog,
    VehicleClass, VehicleDefinition, VehicleState, VehicleStatus,
};

/// Merges a stored JSON document with the catalog into a [`FleetState`].
///
/// Every catalog id is present in the result; ids in storage that are no
/// longer in the catalog are dropped. A slot holds at most one vehicle:
/// when a corrupted document stores two occupants for the same team slot,
/// the first in catalog order keeps it and the rest fall back to reserve.
/// Applying the merge twice without an intervening mutation yields an
/// identical aggregate.
#[must_use]
pub fn merge_stored(stored: &Value, catalog: &VehicleCatalog) -> FleetState {
    let stored_vehicles = stored.get("vehicles");
    let mut occupied = std::collections::HashSet::new();
    let vehicles = catalog
        .vehicles()
        .iter()
        .map(|def| {
            let entry = stored_vehicles.and_then(|m| m.get(def.id.as_str()));
            let mut vs = coerce_vehicle(entry, def, catalog);
            if let Some(assignment) = &vs.assignment
                && !occupied.insert((assignment.team.clone(), assignment.slot))
            {
                vs.assignment = None;
            }
            (def.id.clone(), vs)
        })
        .collect();

    FleetState {
        vehicles,
        reserve_filter: coerce_reserve_filter(stored),
    }
}

/// Coerces one stored vehicle entry into a [`VehicleState`], falling back
/// to the default state when the entry is absent or not an object.
fn coerce_vehicle(
    entry: Option<&Value>,
    def: &VehicleDefinition,
    catalog: &VehicleCatalog,
) -> VehicleState {
    let Some(entry) = entry.filter(|v| v.is_object()) else {
        return VehicleState::initial();
    };

    // Only the exact unavailable marker flips the status; any other
    // stored value (including garbage) coerces back to Available.
    let status = match entry.get("status").and_then(Value::as_str) {
        Some("Unavailable") => VehicleStatus::Unavailable,
        _ => VehicleStatus::Available,
    };

    let assignment = coerce_assignment(entry, def, catalog);

    let faults = entry
        .get("faults")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(coerce_fault).collect())
        .unwrap_or_default();

    VehicleState {
        status,
        assignment,
        faults,
    }
}

/// Reads `team`/`slot` from a stored entry, accepting the assignment only
/// when both are present, the team exists, and the slot class matches the
/// vehicle's catalog class. Anything else means reserve.
fn coerce_assignment(
    entry: &Value,
    def: &VehicleDefinition,
    catalog: &VehicleCatalog,
) -> Option<Assignment> {
    let team = entry.get("team").and_then(Value::as_str)?;
    let slot: VehicleClass = entry.get("slot").and_then(Value::as_str)?.parse().ok()?;
    if slot != def.class {
        return None;
    }
    let team_id = TeamId::from(team);
    catalog.team(&team_id)?;
    Some(Assignment::new(team_id, slot))
}

/// Coerces one stored fault element into a [`FaultRecord`].
///
/// Tolerates the earlier schema of the source system: `date` instead of
/// `timestamp`, `desc` instead of `description`, and no id at all (a
/// fresh one is generated). Non-object elements are skipped.
fn coerce_fault(entry: &Value) -> Option<FaultRecord> {
    if !entry.is_object() {
        return None;
    }

    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<uuid::Uuid>().ok())
        .map_or_else(FaultId::new, FaultId::from_uuid);

    let timestamp = entry
        .get("timestamp")
        .or_else(|| entry.get("date"))
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let description = entry
        .get("description")
        .or_else(|| entry.get("desc"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(FaultRecord {
        id,
        timestamp,
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// Parses an RFC 3339 timestamp, falling back to the source system's
/// minute-resolution local form `YYYY-MM-DDTHH:MM`.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Reads the persisted reserve filter, defaulting to `All` on anything
/// unrecognized. Accepts the older camel-case key as well.
fn coerce_reserve_filter(stored: &Value) -> ReserveFilter {
    let raw = stored
        .get("reserve_filter")
        .or_else(|| stored.get("reserveFilter"))
        .and_then(Value::as_str);
    match raw {
        Some("LightCar") => ReserveFilter::LightCar,
        Some("Ambulance") => ReserveFilter::Ambulance,
        _ => ReserveFilter::All,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::VehicleId;
    use serde_json::json;

    fn catalog() -> VehicleCatalog {
        VehicleCatalog::standard()
    }

    #[test]
    fn empty_document_yields_initial_state() {
        let merged = merge_stored(&json!({}), &catalog());
        assert_eq!(merged, FleetState::initial(&catalog()));
    }

    #[test]
    fn every_catalog_id_present_after_merge() {
        // Storage only knows about one vehicle; the other eight are filled in.
        let stored = json!({
            "vehicles": {
                "VLM1": { "status": "Unavailable", "faults": [] }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        assert_eq!(merged.vehicles.len(), catalog().len());
        let vlm1 = merged.vehicle(&VehicleId::from("VLM1"));
        let Some(vlm1) = vlm1 else {
            panic!("VLM1 missing after merge");
        };
        assert_eq!(vlm1.status, VehicleStatus::Unavailable);
    }

    #[test]
    fn unknown_catalog_ids_are_dropped() {
        let stored = json!({
            "vehicles": {
                "RETIRED9": { "status": "Unavailable" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        assert!(merged.vehicle(&VehicleId::from("RETIRED9")).is_none());
    }

    #[test]
    fn status_coercion_requires_exact_marker() {
        let stored = json!({
            "vehicles": {
                "VLM1": { "status": "INDISPO" },
                "VLM2": { "status": "unavailable" },
                "VLM3": { "status": 42 },
                "VLM4": { "status": "Unavailable" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        for id in ["VLM1", "VLM2", "VLM3"] {
            let vs = merged.vehicle(&VehicleId::from(id));
            assert_eq!(vs.map(|v| v.status), Some(VehicleStatus::Available), "{id}");
        }
        let vs = merged.vehicle(&VehicleId::from("VLM4"));
        assert_eq!(vs.map(|v| v.status), Some(VehicleStatus::Unavailable));
    }

    #[test]
    fn valid_assignment_survives_merge() {
        let stored = json!({
            "vehicles": {
                "UMH1": { "status": "Available", "team": "E2", "slot": "Ambulance" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let assignment = merged
            .vehicle(&VehicleId::from("UMH1"))
            .and_then(|v| v.assignment.clone());
        let Some(assignment) = assignment else {
            panic!("assignment was dropped");
        };
        assert_eq!(assignment.team.as_str(), "E2");
        assert_eq!(assignment.slot, VehicleClass::Ambulance);
    }

    #[test]
    fn mismatched_slot_class_is_dropped() {
        // UMH1 is an ambulance; a stored LightCar slot cannot be honored.
        let stored = json!({
            "vehicles": {
                "UMH1": { "team": "E1", "slot": "LightCar" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let vs = merged.vehicle(&VehicleId::from("UMH1"));
        assert_eq!(vs.map(VehicleState::is_reserve), Some(true));
    }

    #[test]
    fn unknown_team_or_partial_assignment_means_reserve() {
        let stored = json!({
            "vehicles": {
                "VLM1": { "team": "E9", "slot": "LightCar" },
                "VLM2": { "slot": "LightCar" },
                "VLM3": { "team": "E1" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        for id in ["VLM1", "VLM2", "VLM3"] {
            let vs = merged.vehicle(&VehicleId::from(id));
            assert_eq!(vs.map(VehicleState::is_reserve), Some(true), "{id}");
        }
    }

    #[test]
    fn duplicate_slot_occupants_resolve_in_catalog_order() {
        // Corrupted storage claims the E1 light-car slot twice; VLM1 comes
        // first in the catalog, so VLM3 is pushed back to reserve.
        let stored = json!({
            "vehicles": {
                "VLM3": { "team": "E1", "slot": "LightCar" },
                "VLM1": { "team": "E1", "slot": "LightCar" },
                "UMH1": { "team": "E1", "slot": "Ambulance" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let vlm1 = merged
            .vehicle(&VehicleId::from("VLM1"))
            .and_then(|v| v.assignment.clone());
        let Some(vlm1) = vlm1 else {
            panic!("catalog-first occupant lost its slot");
        };
        assert_eq!(vlm1.team.as_str(), "E1");
        let vlm3 = merged.vehicle(&VehicleId::from("VLM3"));
        assert_eq!(vlm3.map(VehicleState::is_reserve), Some(true));
        // The same team's other slot class is untouched.
        let umh1 = merged
            .vehicle(&VehicleId::from("UMH1"))
            .and_then(|v| v.assignment.clone());
        assert!(umh1.is_some());
    }

    #[test]
    fn non_array_faults_default_to_empty() {
        let stored = json!({
            "vehicles": {
                "VLM1": { "faults": "corrupted" }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let faults = merged.vehicle(&VehicleId::from("VLM1")).map(|v| v.faults.len());
        assert_eq!(faults, Some(0));
    }

    #[test]
    fn legacy_fault_fields_are_coerced() {
        let stored = json!({
            "vehicles": {
                "UMH2": {
                    "status": "Unavailable",
                    "faults": [
                        { "date": "2024-03-09T14:30", "desc": "gearbox noise" },
                        "not-an-object"
                    ]
                }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let faults = merged
            .vehicle(&VehicleId::from("UMH2"))
            .map(|v| v.faults.clone())
            .unwrap_or_default();
        assert_eq!(faults.len(), 1);
        let Some(fault) = faults.first() else {
            panic!("fault missing");
        };
        assert_eq!(fault.description, "gearbox noise");
        assert!(fault.title.is_empty());
        assert_eq!(fault.timestamp.to_rfc3339(), "2024-03-09T14:30:00+00:00");
    }

    #[test]
    fn fault_id_and_rfc3339_timestamp_are_preserved() {
        let uuid = uuid::Uuid::new_v4();
        let stored = json!({
            "vehicles": {
                "VLM2": {
                    "faults": [{
                        "id": uuid.to_string(),
                        "timestamp": "2025-01-15T08:00:00Z",
                        "title": "Flat tire",
                        "description": ""
                    }]
                }
            }
        });
        let merged = merge_stored(&stored, &catalog());
        let fault = merged
            .vehicle(&VehicleId::from("VLM2"))
            .and_then(|v| v.faults.first().cloned());
        let Some(fault) = fault else {
            panic!("fault missing");
        };
        assert_eq!(*fault.id.as_uuid(), uuid);
        assert_eq!(fault.timestamp.to_rfc3339(), "2025-01-15T08:00:00+00:00");
        assert_eq!(fault.title, "Flat tire");
    }

    #[test]
    fn reserve_filter_coercion() {
        let merged = merge_stored(&json!({ "reserve_filter": "Ambulance" }), &catalog());
        assert_eq!(merged.reserve_filter, ReserveFilter::Ambulance);

        let merged = merge_stored(&json!({ "reserveFilter": "LightCar" }), &catalog());
        assert_eq!(merged.reserve_filter, ReserveFilter::LightCar);

        let merged = merge_stored(&json!({ "reserve_filter": "Everything" }), &catalog());
        assert_eq!(merged.reserve_filter, ReserveFilter::All);
    }

    #[test]
    fn merge_is_idempotent_for_well_formed_storage() {
        let stored = json!({
            "reserve_filter": "LightCar",
            "vehicles": {
                "VLM1": { "status": "Unavailable", "team": "E1", "slot": "LightCar",
                          "faults": [{ "id": uuid::Uuid::new_v4().to_string(),
                                       "timestamp": "2025-02-01T10:00:00Z",
                                       "title": "t", "description": "d" }] }
            }
        });
        let first = merge_stored(&stored, &catalog());
        let second = merge_stored(&stored, &catalog());
        assert_eq!(first, second);
    }
}
