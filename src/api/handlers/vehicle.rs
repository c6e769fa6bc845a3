//! Vehicle handlers: state views, availability transitions, fault CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    FaultDto, FaultListResponse, FaultPayload, MarkUnavailableRequest, StatusResponse, VehicleDto,
    VehicleListResponse,
};
use crate::app_state::AppState;
use crate::domain::{FaultId, VehicleId, VehicleStatus};
use crate::error::{BoardError, ErrorResponse};

/// `GET /vehicles` — List every vehicle with its current state.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    summary = "List vehicles",
    description = "Returns every catalog vehicle in catalog order with status, assignment, and fault count.",
    responses(
        (status = 200, description = "Vehicle list", body = VehicleListResponse),
    )
)]
pub async fn list_vehicles(State(state): State<AppState>) -> impl IntoResponse {
    let data = state
        .queries
        .vehicle_views()
        .await
        .into_iter()
        .map(VehicleDto::from)
        .collect();
    Json(VehicleListResponse { data })
}

/// `GET /vehicles/:id` — Get one vehicle's state.
///
/// # Errors
///
/// Returns [`BoardError::VehicleNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    summary = "Get vehicle details",
    params(
        ("id" = String, Path, description = "Vehicle id"),
    ),
    responses(
        (status = 200, description = "Vehicle details", body = VehicleDto),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    let view = state.queries.vehicle_view(&VehicleId::from(id)).await?;
    Ok(Json(VehicleDto::from(view)))
}

/// `POST /vehicles/:id/unavailable` — Take a vehicle out of service.
///
/// # Errors
///
/// Returns [`BoardError`] for an unknown vehicle, a blank fault payload,
/// or a bare call on a vehicle with no fault on record.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/unavailable",
    tag = "Vehicles",
    summary = "Mark a vehicle unavailable",
    description = "Freezes the vehicle's board assignment. A fault payload is recorded first; without one the vehicle must already carry a fault record.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
    ),
    request_body = MarkUnavailableRequest,
    responses(
        (status = 200, description = "Vehicle marked unavailable", body = StatusResponse),
        (status = 400, description = "Blank payload or no fault on record", body = ErrorResponse),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
    )
)]
pub async fn mark_unavailable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MarkUnavailableRequest>,
) -> Result<impl IntoResponse, BoardError> {
    let vehicle_id = VehicleId::from(id);
    let payload = (req.title.is_some() || req.description.is_some()).then(|| {
        (
            req.title.as_deref().unwrap_or(""),
            req.description.as_deref().unwrap_or(""),
        )
    });
    let fault = state.fault_log.mark_unavailable(&vehicle_id, payload).await?;

    Ok(Json(StatusResponse {
        vehicle_id: vehicle_id.to_string(),
        status: VehicleStatus::Unavailable.as_str().to_string(),
        fault: fault.map(FaultDto::from),
    }))
}

/// `POST /vehicles/:id/available` — Return a vehicle to service.
///
/// # Errors
///
/// Returns [`BoardError::VehicleNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/available",
    tag = "Vehicles",
    summary = "Mark a vehicle available",
    description = "Unfreezes the vehicle's board assignment. The fault history is left intact.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
    ),
    responses(
        (status = 200, description = "Vehicle restored to service", body = StatusResponse),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
    )
)]
pub async fn mark_available(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    let vehicle_id = VehicleId::from(id);
    state.fault_log.mark_available(&vehicle_id).await?;

    Ok(Json(StatusResponse {
        vehicle_id: vehicle_id.to_string(),
        status: VehicleStatus::Available.as_str().to_string(),
        fault: None,
    }))
}

/// `POST /vehicles/:id/faults` — Report a new fault.
///
/// # Errors
///
/// Returns [`BoardError`] for an unknown vehicle or a blank payload.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/faults",
    tag = "Faults",
    summary = "Report a fault",
    description = "Prepends a fault record to the vehicle's history. Reporting does not change availability.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
    ),
    request_body = FaultPayload,
    responses(
        (status = 201, description = "Fault recorded", body = FaultDto),
        (status = 400, description = "Title and description both blank", body = ErrorResponse),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
    )
)]
pub async fn report_fault(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FaultPayload>,
) -> Result<impl IntoResponse, BoardError> {
    let record = state
        .fault_log
        .report_fault(&VehicleId::from(id), &req.title, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(FaultDto::from(record))))
}

/// `GET /vehicles/:id/faults` — List a vehicle's fault history.
///
/// # Errors
///
/// Returns [`BoardError::VehicleNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}/faults",
    tag = "Faults",
    summary = "List fault records",
    description = "Returns the vehicle's fault history, newest first.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
    ),
    responses(
        (status = 200, description = "Fault history", body = FaultListResponse),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
    )
)]
pub async fn list_faults(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    let faults = state.fault_log.faults_of(&VehicleId::from(id)).await?;
    Ok(Json(FaultListResponse {
        data: faults.into_iter().map(FaultDto::from).collect(),
    }))
}

/// `PATCH /vehicles/:id/faults/:fault_id` — Edit a fault record.
///
/// # Errors
///
/// Returns [`BoardError`] for unknown ids or a blank payload.
#[utoipa::path(
    patch,
    path = "/api/v1/vehicles/{id}/faults/{fault_id}",
    tag = "Faults",
    summary = "Edit a fault record",
    description = "Rewrites title and description. The record's id and timestamp never change.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
        ("fault_id" = uuid::Uuid, Path, description = "Fault record UUID"),
    ),
    request_body = FaultPayload,
    responses(
        (status = 200, description = "Fault updated", body = FaultDto),
        (status = 400, description = "Title and description both blank", body = ErrorResponse),
        (status = 404, description = "Unknown vehicle or fault", body = ErrorResponse),
    )
)]
pub async fn edit_fault(
    State(state): State<AppState>,
    Path((id, fault_id)): Path<(String, uuid::Uuid)>,
    Json(req): Json<FaultPayload>,
) -> Result<impl IntoResponse, BoardError> {
    let record = state
        .fault_log
        .edit_fault(
            &VehicleId::from(id),
            FaultId::from_uuid(fault_id),
            &req.title,
            &req.description,
        )
        .await?;
    Ok(Json(FaultDto::from(record)))
}

/// `DELETE /vehicles/:id/faults/:fault_id` — Delete a fault record.
///
/// # Errors
///
/// Returns [`BoardError`] for unknown ids.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}/faults/{fault_id}",
    tag = "Faults",
    summary = "Delete a fault record",
    description = "Removes the record from the history. Deleting the last record does not restore availability.",
    params(
        ("id" = String, Path, description = "Vehicle id"),
        ("fault_id" = uuid::Uuid, Path, description = "Fault record UUID"),
    ),
    responses(
        (status = 204, description = "Fault deleted"),
        (status = 404, description = "Unknown vehicle or fault", body = ErrorResponse),
    )
)]
pub async fn delete_fault(
    State(state): State<AppState>,
    Path((id, fault_id)): Path<(String, uuid::Uuid)>,
) -> Result<impl IntoResponse, BoardError> {
    state
        .fault_log
        .delete_fault(&VehicleId::from(id), FaultId::from_uuid(fault_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Vehicle and fault routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/{id}", get(get_vehicle))
        .route("/vehicles/{id}/unavailable", post(mark_unavailable))
        .route("/vehicles/{id}/available", post(mark_available))
        .route("/vehicles/{id}/faults", post(report_fault).get(list_faults))
        .route(
            "/vehicles/{id}/faults/{fault_id}",
            axum::routing::patch(edit_fault).delete(delete_fault),
        )
}
