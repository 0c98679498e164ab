//! Threat Module - alert records and session threat tiers

pub mod level;
pub mod types;

pub use level::{NormalizedThreatLevel, ThreatLevel};
pub use types::{round_score, Alert, Severity};
