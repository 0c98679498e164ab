//! Session threat tiers
//!
//! Two independent views are reported side by side: a cumulative tier on the
//! all-time threat count and a rate tier on the attack ratio. They can
//! disagree (e.g. `Critical` with `Normal`).

use serde::Serialize;

use crate::constants::{CRITICAL_THREAT_COUNT, ELEVATED_THREAT_COUNT, NORMALIZED_HIGH_RATIO};

/// Cumulative tier on the all-time threat counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThreatLevel {
    Normal,
    Elevated,
    Critical,
}

impl ThreatLevel {
    pub fn from_threat_count(threat_count: u64) -> Self {
        if threat_count > CRITICAL_THREAT_COUNT {
            ThreatLevel::Critical
        } else if threat_count > ELEVATED_THREAT_COUNT {
            ThreatLevel::Elevated
        } else {
            ThreatLevel::Normal
        }
    }
}

/// Rate tier on `threat_count / total_sampled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NormalizedThreatLevel {
    Normal,
    High,
}

impl NormalizedThreatLevel {
    /// An empty session counts as one sample so the ratio is 0, not NaN
    pub fn from_counts(threat_count: u64, total_sampled: u64) -> Self {
        let ratio = threat_count as f64 / total_sampled.max(1) as f64;
        if ratio < NORMALIZED_HIGH_RATIO {
            NormalizedThreatLevel::Normal
        } else {
            NormalizedThreatLevel::High
        }
    }
}
