//! NIDS Core - traffic simulation over a pre-trained intrusion classifier
//!
//! Draws pre-encoded NSL-KDD feature rows from a fixed pool, scores them with
//! an exported random forest and keeps the aggregate threat counters and the
//! rolling alert feed that the dashboard polls.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │ SamplePool   │     │ ForestModel  │  (artifacts from the training side)
//! └──────┬───────┘     └──────┬───────┘
//!        │   sample()         │ predict() / predict_proba()
//!        └─────────┬──────────┘
//!                  ▼
//!        ┌───────────────────┐
//!        │ TrafficSimulator  │  Mutex<SimulationState>
//!        │  counters + alerts│
//!        └───────────────────┘
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{NidsError, NidsResult};
pub use logic::evaluation::{evaluate, top_features, EvaluationReport, FeatureImportance};
pub use logic::model::{Classifier, ClassifierError, ForestModel, TrafficLabel};
pub use logic::pool::SamplePool;
pub use logic::simulation::{TrafficSimulator, TrafficStats};
pub use logic::threat::{Alert, NormalizedThreatLevel, Severity, ThreatLevel};
