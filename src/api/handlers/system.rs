//! System endpoints: health check, team and class catalogs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::VehicleClass;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Duty team info.
#[derive(Debug, Serialize, ToSchema)]
struct TeamInfo {
    team_id: String,
    display_name: String,
}

/// `GET /config/teams` — List the configured duty teams.
#[utoipa::path(
    get,
    path = "/config/teams",
    tag = "System",
    summary = "List duty teams",
    description = "Returns the fixed team configuration in board order.",
    responses(
        (status = 200, description = "Team catalog", body = Vec<TeamInfo>),
    )
)]
pub async fn teams_handler(State(state): State<AppState>) -> impl IntoResponse {
    let teams: Vec<TeamInfo> = state
        .board
        .catalog()
        .teams()
        .iter()
        .map(|team| TeamInfo {
            team_id: team.id.to_string(),
            display_name: team.display_name.clone(),
        })
        .collect();
    (StatusCode::OK, Json(teams))
}

/// Vehicle class info.
#[derive(Debug, Serialize, ToSchema)]
struct VehicleClassInfo {
    class: &'static str,
    description: &'static str,
}

/// `GET /config/vehicle-classes` — List supported vehicle classes.
#[utoipa::path(
    get,
    path = "/config/vehicle-classes",
    tag = "System",
    summary = "List vehicle classes",
    description = "Returns the classes vehicles and slots are typed with, in slot order.",
    responses(
        (status = 200, description = "Class catalog", body = Vec<VehicleClassInfo>),
    )
)]
pub async fn vehicle_classes_handler() -> impl IntoResponse {
    let classes: Vec<VehicleClassInfo> = VehicleClass::ALL
        .into_iter()
        .map(|class| VehicleClassInfo {
            class: class.as_str(),
            description: match class {
                VehicleClass::LightCar => "Quick-response light car",
                VehicleClass::Ambulance => "Mobile intensive-care ambulance",
            },
        })
        .collect();
    (StatusCode::OK, Json(classes))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/teams", get(teams_handler))
        .route("/config/vehicle-classes", get(vehicle_classes_handler))
}
