//! Threat Types
//!
//! Core types for alerts. No aggregation logic lives here.

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use crate::constants::{ALERT_CATEGORY, HIGH_SEVERITY_PROBABILITY};

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    /// `High` strictly above the threshold, on the unrounded probability
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_SEVERITY_PROBABILITY {
            Severity::High
        } else {
            Severity::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT
// ============================================================================

/// One attack verdict in the rolling feed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Value of the sample counter when the alert fired
    pub id: u64,
    pub severity: Severity,
    /// Attack probability rounded to two decimals
    pub score: f64,
    #[serde(rename = "type")]
    pub category: &'static str,
    #[serde(serialize_with = "serialize_clock_time")]
    pub timestamp: DateTime<Local>,
}

impl Alert {
    pub fn new(id: u64, probability: f64, timestamp: DateTime<Local>) -> Self {
        Self {
            id,
            severity: Severity::from_probability(probability),
            score: round_score(probability),
            category: ALERT_CATEGORY,
            timestamp,
        }
    }
}

/// Two-decimal rounding of the exact binary value, ties to even
pub fn round_score(probability: f64) -> f64 {
    format!("{:.2}", probability).parse().unwrap_or(probability)
}

fn serialize_clock_time<S: Serializer>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format("%H:%M:%S"))
}
