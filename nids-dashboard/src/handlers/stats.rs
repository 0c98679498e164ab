//! Stats handler

use axum::{extract::State, Json};
use nids_core::{NormalizedThreatLevel, ThreatLevel, TrafficStats};
use serde::Serialize;

use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_packets: u64,
    pub threats_detected: u64,
    pub threat_level: ThreatLevel,
    pub threat_level_normalized: NormalizedThreatLevel,
    pub simulation_running: bool,
}

impl From<TrafficStats> for StatsResponse {
    fn from(stats: TrafficStats) -> Self {
        Self {
            total_packets: stats.total_sampled,
            threats_detected: stats.threat_count,
            threat_level: stats.threat_level,
            threat_level_normalized: stats.threat_level_normalized,
            simulation_running: stats.running,
        }
    }
}

/// Current traffic statistics.
///
/// Not a pure read: while the simulation is running every poll first samples
/// a burst of 1-5 rows. The dashboard's polling is the traffic source.
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.simulator.stats()?;
    Ok(Json(stats.into()))
}
