//! Central Configuration Constants
//!
//! Single source of truth for the simulation thresholds.

/// Alerts kept in the rolling feed (newest first)
pub const MAX_ALERTS: usize = 50;

/// Attack probability above which an alert is `High` instead of `Medium`
pub const HIGH_SEVERITY_PROBABILITY: f64 = 0.8;

/// Threat count above which the session is `Elevated`
pub const ELEVATED_THREAT_COUNT: u64 = 20;

/// Threat count above which the session is `Critical`
pub const CRITICAL_THREAT_COUNT: u64 = 100;

/// Threat ratio at or above which the normalized level is `High`
pub const NORMALIZED_HIGH_RATIO: f64 = 0.1;

/// Smallest burst of samples triggered by one stats poll
pub const BURST_MIN: usize = 1;

/// Largest burst of samples triggered by one stats poll
pub const BURST_MAX: usize = 5;

/// Samples drawn before the server accepts traffic
pub const DEFAULT_PREWARM_SAMPLES: usize = 20;

/// Category attached to every alert (the model is binary)
pub const ALERT_CATEGORY: &str = "Malicious Activity";
