//! Simulation run control

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ControlResponse {
    status: &'static str,
    running: bool,
}

impl ControlResponse {
    fn from_running(running: bool) -> Self {
        Self {
            status: if running { "started" } else { "stopped" },
            running,
        }
    }
}

pub async fn start(State(state): State<AppState>) -> Json<ControlResponse> {
    Json(ControlResponse::from_running(state.simulator.start()))
}

pub async fn stop(State(state): State<AppState>) -> Json<ControlResponse> {
    Json(ControlResponse::from_running(state.simulator.stop()))
}
