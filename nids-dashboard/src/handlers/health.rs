//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    simulation_running: bool,
    pool_rows: usize,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        simulation_running: state.simulator.is_running(),
        pool_rows: state.simulator.pool().len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
