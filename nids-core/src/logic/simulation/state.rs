//! Aggregation state guarded by the simulator lock

use std::collections::VecDeque;

use chrono::Local;

use super::TrafficStats;
use crate::constants::MAX_ALERTS;
use crate::logic::threat::{Alert, NormalizedThreatLevel, ThreatLevel};

pub(super) struct SimulationState<R> {
    pub total_sampled: u64,
    pub threat_count: u64,
    /// Newest first, never longer than `MAX_ALERTS`
    pub alerts: VecDeque<Alert>,
    pub running: bool,
    pub rng: R,
}

impl<R> SimulationState<R> {
    pub fn new(rng: R) -> Self {
        Self {
            total_sampled: 0,
            threat_count: 0,
            alerts: VecDeque::with_capacity(MAX_ALERTS),
            running: true,
            rng,
        }
    }

    /// Count one classified sample; attacks also land in the feed
    pub fn record(&mut self, is_attack: bool, attack_probability: f64) {
        self.total_sampled += 1;

        if is_attack {
            self.threat_count += 1;
            self.alerts
                .push_front(Alert::new(self.total_sampled, attack_probability, Local::now()));
            self.alerts.truncate(MAX_ALERTS);
        }
    }

    pub fn stats(&self) -> TrafficStats {
        TrafficStats {
            total_sampled: self.total_sampled,
            threat_count: self.threat_count,
            threat_level: ThreatLevel::from_threat_count(self.threat_count),
            threat_level_normalized: NormalizedThreatLevel::from_counts(
                self.threat_count,
                self.total_sampled,
            ),
            running: self.running,
        }
    }
}
