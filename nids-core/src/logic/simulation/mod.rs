//! Traffic Simulation - live-traffic emulation over the sample pool
//!
//! Every sample bumps the counters; every attack verdict also prepends an
//! alert to a feed capped at `MAX_ALERTS`. Counters stay exact after the
//! feed starts evicting, so `threat_count` may exceed the feed length.

mod state;


use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{BURST_MAX, BURST_MIN};
use crate::error::{NidsError, NidsResult};
use crate::logic::model::Classifier;
use crate::logic::pool::SamplePool;
use crate::logic::threat::{Alert, NormalizedThreatLevel, Severity, ThreatLevel};
use state::SimulationState;

/// Counters and derived tiers at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficStats {
    pub total_sampled: u64,
    pub threat_count: u64,
    pub threat_level: ThreatLevel,
    pub threat_level_normalized: NormalizedThreatLevel,
    pub running: bool,
}

/// Owns the aggregation state. All operations take the one lock exactly
/// once, so concurrent callers never interleave inside a sample or a burst.
pub struct TrafficSimulator<R = StdRng> {
    pool: Arc<SamplePool>,
    classifier: Arc<dyn Classifier>,
    state: Mutex<SimulationState<R>>,
}

impl TrafficSimulator<StdRng> {
    /// Seeded when `seed` is given, otherwise from OS entropy
    pub fn from_seed(
        pool: Arc<SamplePool>,
        classifier: Arc<dyn Classifier>,
        seed: Option<u64>,
    ) -> NidsResult<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(pool, classifier, rng)
    }
}

impl<R: Rng> TrafficSimulator<R> {
    /// Fresh state: zero counters, empty feed, running.
    ///
    /// Refuses an empty pool and a pool whose width differs from what the
    /// classifier was trained on.
    pub fn new(pool: Arc<SamplePool>, classifier: Arc<dyn Classifier>, rng: R) -> NidsResult<Self> {
        if pool.is_empty() {
            return Err(NidsError::EmptyPool);
        }
        if pool.width() != classifier.n_features() {
            return Err(NidsError::FeatureMismatch {
                model: classifier.n_features(),
                pool: pool.width(),
            });
        }

        Ok(Self {
            pool,
            classifier,
            state: Mutex::new(SimulationState::new(rng)),
        })
    }

    /// Sample and score one row. Returns whether it was an attack.
    pub fn simulate(&self) -> NidsResult<bool> {
        let mut state = self.state.lock();
        self.simulate_locked(&mut state)
    }

    /// Run `count` samples back to back (startup pre-warm)
    pub fn prewarm(&self, count: usize) -> NidsResult<TrafficStats> {
        let mut state = self.state.lock();
        for _ in 0..count {
            self.simulate_locked(&mut state)?;
        }
        log::info!(
            "Pre-warmed simulation: {} samples, {} threats",
            state.total_sampled,
            state.threat_count
        );
        Ok(state.stats())
    }

    /// Derived stats for a dashboard poll.
    ///
    /// While running, each call first samples a burst of `BURST_MIN..=BURST_MAX`
    /// rows: observing the dashboard is what drives the simulated traffic.
    /// The burst and the snapshot share one lock acquisition.
    pub fn stats(&self) -> NidsResult<TrafficStats> {
        let mut state = self.state.lock();
        if state.running {
            let burst = state.rng.gen_range(BURST_MIN..=BURST_MAX);
            for _ in 0..burst {
                self.simulate_locked(&mut state)?;
            }
            log::debug!("Simulated burst of {} samples", burst);
        }
        Ok(state.stats())
    }

    /// Stats without triggering a burst
    pub fn snapshot(&self) -> TrafficStats {
        self.state.lock().stats()
    }

    /// Alert feed, newest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.state.lock().alerts.iter().cloned().collect()
    }

    pub fn start(&self) -> bool {
        self.set_running(true)
    }

    pub fn stop(&self) -> bool {
        self.set_running(false)
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn pool(&self) -> &SamplePool {
        &self.pool
    }

    fn set_running(&self, running: bool) -> bool {
        let mut state = self.state.lock();
        if state.running != running {
            log::info!("Simulation {}", if running { "started" } else { "stopped" });
        }
        state.running = running;
        state.running
    }

    /// Classification runs before any counter moves, so a classifier
    /// failure leaves the state untouched.
    fn simulate_locked(&self, state: &mut SimulationState<R>) -> NidsResult<bool> {
        let (index, row) = self.pool.sample(&mut state.rng)?;
        let label = self.classifier.predict(row)?;
        let [_, attack_probability] = self.classifier.predict_proba(row)?;

        let is_attack = label.is_attack();
        state.record(is_attack, attack_probability);

        if is_attack {
            log::debug!(
                "Row {} classified as attack ({}, p={:.2}), sample #{}",
                index,
                Severity::from_probability(attack_probability),
                attack_probability,
                state.total_sampled
            );
        }

        Ok(is_attack)
    }
}
