//! Configuration module

use std::env;
use std::path::PathBuf;

use nids_core::constants::DEFAULT_PREWARM_SAMPLES;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Pre-encoded feature rows to sample from
    pub pool_path: PathBuf,

    /// Exported random forest
    pub model_path: PathBuf,

    /// Samples drawn before the server starts listening
    pub prewarm_samples: usize,

    /// Fixed RNG seed for reproducible sessions
    pub simulation_seed: Option<u64>,

    /// Log an evaluation report when the pool is labeled
    pub evaluate_on_startup: bool,

    /// Emit JSON log lines instead of text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            pool_path: env::var("POOL_PATH")
                .unwrap_or_else(|_| "data/sample_pool.json".to_string())
                .into(),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "data/forest_model.json".to_string())
                .into(),

            prewarm_samples: env::var("PREWARM_SAMPLES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_PREWARM_SAMPLES),

            simulation_seed: parse_seed(env::var("SIMULATION_SEED").ok()),

            evaluate_on_startup: env::var("EVALUATE_ON_STARTUP")
                .map(|s| s.to_lowercase() != "false" && s != "0")
                .unwrap_or(true),

            log_json: Self::log_json_from_env(),
        }
    }

    /// Read before the rest so logging is up when config warnings fire
    pub fn log_json_from_env() -> bool {
        env::var("LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

/// A set but unparsable seed falls back to entropy, loudly
fn parse_seed(raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(e) => {
            tracing::warn!(
                "Ignoring SIMULATION_SEED={:?} ({}), session will not be reproducible",
                raw,
                e
            );
            None
        }
    }
}
