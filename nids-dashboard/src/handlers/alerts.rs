//! Alerts handler

use axum::{extract::State, Json};
use nids_core::Alert;

use crate::AppState;

/// Up to 50 most recent alerts, newest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.simulator.alerts())
}
