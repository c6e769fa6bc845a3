//! REST endpoint handlers organized by resource.

pub mod board;
pub mod system;
pub mod vehicle;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(board::routes()).merge(vehicle::routes())
}
