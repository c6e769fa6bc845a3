//! Assignment-board handlers: slots, reserve pool, counts, preferences.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    AssignRequest, AssignResponse, CountsResponse, OccupantResponse, ReserveFilterDto,
    ReserveQuery, ReserveResponse,
};
use crate::app_state::AppState;
use crate::domain::{ReserveFilter, TeamId, VehicleClass, VehicleId};
use crate::error::{BoardError, ErrorResponse};

/// `POST /assignments` — Place a vehicle in a team slot.
///
/// # Errors
///
/// Returns [`BoardError`] on unknown ids, class mismatch, or a locked
/// vehicle.
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    tag = "Board",
    summary = "Assign a vehicle to a team slot",
    description = "Places the vehicle in the team's slot of the given class. If the slot is occupied, the occupant is displaced to reserve in the same operation.",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Vehicle assigned", body = AssignResponse),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
        (status = 409, description = "Vehicle is unavailable", body = ErrorResponse),
        (status = 422, description = "Vehicle class does not match the slot", body = ErrorResponse),
    )
)]
pub async fn assign(
    State(state): State<AppState>,
    Json(req): Json<AssignRequest>,
) -> Result<impl IntoResponse, BoardError> {
    let slot = parse_class(&req.slot)?;
    let vehicle_id = VehicleId::from(req.vehicle_id);
    let team_id = TeamId::from(req.team_id);

    let displaced = state.board.assign(&vehicle_id, &team_id, slot).await?;

    Ok(Json(AssignResponse {
        vehicle_id: vehicle_id.to_string(),
        team_id: team_id.to_string(),
        slot: slot.as_str().to_string(),
        displaced: displaced.map(|id| id.to_string()),
        assigned_at: Utc::now(),
    }))
}

/// `DELETE /assignments/:vehicle_id` — Return a vehicle to reserve.
///
/// # Errors
///
/// Returns [`BoardError`] on an unknown or locked vehicle.
#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{vehicle_id}",
    tag = "Board",
    summary = "Return a vehicle to the reserve pool",
    description = "Clears the vehicle's slot assignment. Unassigning a vehicle already in reserve is a no-op.",
    params(
        ("vehicle_id" = String, Path, description = "Vehicle id"),
    ),
    responses(
        (status = 204, description = "Vehicle returned to reserve"),
        (status = 404, description = "Unknown vehicle", body = ErrorResponse),
        (status = 409, description = "Vehicle is unavailable", body = ErrorResponse),
    )
)]
pub async fn unassign(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    state.board.unassign(&VehicleId::from(vehicle_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /teams/:team_id/slots/:slot` — Look up a slot's occupant.
///
/// # Errors
///
/// Returns [`BoardError::InvalidRequest`] on an unknown slot class.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/slots/{slot}",
    tag = "Board",
    summary = "Get the occupant of a team slot",
    params(
        ("team_id" = String, Path, description = "Team id"),
        ("slot" = String, Path, description = "Slot class"),
    ),
    responses(
        (status = 200, description = "Slot occupancy", body = OccupantResponse),
        (status = 400, description = "Unknown slot class", body = ErrorResponse),
    )
)]
pub async fn slot_occupant(
    State(state): State<AppState>,
    Path((team_id, slot)): Path<(String, String)>,
) -> Result<impl IntoResponse, BoardError> {
    let slot = parse_class(&slot)?;
    let team_id = TeamId::from(team_id);
    let occupant = state.board.occupant_of(&team_id, slot).await;

    Ok(Json(OccupantResponse {
        team_id: team_id.to_string(),
        slot: slot.as_str().to_string(),
        occupant: occupant.map(|id| id.to_string()),
    }))
}

/// `GET /reserve` — List the reserve pool, optionally by class.
///
/// # Errors
///
/// Returns [`BoardError::InvalidRequest`] on an unknown class value.
#[utoipa::path(
    get,
    path = "/api/v1/reserve",
    tag = "Board",
    summary = "List reserve vehicles",
    description = "Returns unassigned vehicles in catalog order, regardless of availability status.",
    params(ReserveQuery),
    responses(
        (status = 200, description = "Reserve pool", body = ReserveResponse),
        (status = 400, description = "Unknown class value", body = ErrorResponse),
    )
)]
pub async fn reserve(
    State(state): State<AppState>,
    Query(query): Query<ReserveQuery>,
) -> Result<impl IntoResponse, BoardError> {
    let class = query.class.as_deref().map(parse_class).transpose()?;
    let pool = state.board.reserve_pool(class).await;

    Ok(Json(ReserveResponse {
        vehicle_ids: pool.into_iter().map(|id| id.to_string()).collect(),
    }))
}

/// `GET /board` — Full dashboard projection.
#[utoipa::path(
    get,
    path = "/api/v1/board",
    tag = "Board",
    summary = "Get the full board view",
    description = "Returns the team grid, the filtered reserve pool, the reserve-filter preference, and the status counts in one consistent snapshot.",
    responses(
        (status = 200, description = "Board view", body = serde_json::Value),
    )
)]
pub async fn board_view(State(state): State<AppState>) -> Result<impl IntoResponse, BoardError> {
    let view = state.queries.board_view().await;
    let value = serde_json::to_value(view).map_err(|e| BoardError::Internal(e.to_string()))?;
    Ok(Json(value))
}

/// `GET /counts` — Fleet-wide status tallies.
#[utoipa::path(
    get,
    path = "/api/v1/counts",
    tag = "Board",
    summary = "Get status counts",
    description = "Available and unavailable counts partition the fleet; the reserve count overlaps both.",
    responses(
        (status = 200, description = "Status counts", body = CountsResponse),
    )
)]
pub async fn counts(State(state): State<AppState>) -> impl IntoResponse {
    Json(CountsResponse::from(state.queries.counts().await))
}

/// `GET /preferences/reserve-filter` — Read the persisted filter.
#[utoipa::path(
    get,
    path = "/api/v1/preferences/reserve-filter",
    tag = "Board",
    summary = "Get the reserve-filter preference",
    responses(
        (status = 200, description = "Current filter", body = ReserveFilterDto),
    )
)]
pub async fn get_reserve_filter(State(state): State<AppState>) -> impl IntoResponse {
    let filter = state.queries.reserve_filter().await;
    Json(ReserveFilterDto {
        filter: filter.as_str().to_string(),
    })
}

/// `PUT /preferences/reserve-filter` — Persist a new filter.
///
/// # Errors
///
/// Returns [`BoardError::InvalidRequest`] on an unknown filter value.
#[utoipa::path(
    put,
    path = "/api/v1/preferences/reserve-filter",
    tag = "Board",
    summary = "Set the reserve-filter preference",
    request_body = ReserveFilterDto,
    responses(
        (status = 200, description = "Filter persisted", body = ReserveFilterDto),
        (status = 400, description = "Unknown filter value", body = ErrorResponse),
    )
)]
pub async fn set_reserve_filter(
    State(state): State<AppState>,
    Json(req): Json<ReserveFilterDto>,
) -> Result<impl IntoResponse, BoardError> {
    let filter: ReserveFilter = req
        .filter
        .parse()
        .map_err(BoardError::InvalidRequest)?;
    state.queries.set_reserve_filter(filter).await?;

    Ok(Json(ReserveFilterDto {
        filter: filter.as_str().to_string(),
    }))
}

/// Board routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", post(assign))
        .route("/assignments/{vehicle_id}", delete(unassign))
        .route("/teams/{team_id}/slots/{slot}", get(slot_occupant))
        .route("/reserve", get(reserve))
        .route("/board", get(board_view))
        .route("/counts", get(counts))
        .route(
            "/preferences/reserve-filter",
            get(get_reserve_filter).put(set_reserve_filter),
        )
}

fn parse_class(s: &str) -> Result<VehicleClass, BoardError> {
    s.parse().map_err(BoardError::InvalidRequest)
}
