//! fleetboard-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fleetboard_gateway::api;
use fleetboard_gateway::app_state::AppState;
use fleetboard_gateway::config::BoardConfig;
use fleetboard_gateway::domain::{EventBus, VehicleCatalog};
use fleetboard_gateway::persistence::FleetStore;
use fleetboard_gateway::service::{AssignmentBoard, BoardQueryService, FaultLog};
use fleetboard_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BoardConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting fleetboard-gateway");

    // Build domain layer
    let catalog = Arc::new(VehicleCatalog::standard());
    let store = Arc::new(FleetStore::new(config.store_path.clone()));
    let state = Arc::new(RwLock::new(store.load(&catalog)));
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let board = Arc::new(AssignmentBoard::new(
        Arc::clone(&catalog),
        Arc::clone(&state),
        Arc::clone(&store),
        event_bus.clone(),
    ));
    let fault_log = Arc::new(FaultLog::new(
        Arc::clone(&catalog),
        Arc::clone(&state),
        Arc::clone(&store),
        event_bus.clone(),
    ));
    let queries = Arc::new(BoardQueryService::new(
        catalog,
        state,
        store,
        event_bus.clone(),
    ));

    // Build application state
    let app_state = AppState {
        board,
        fault_log,
        queries,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
