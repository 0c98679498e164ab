//! Model Module - classifier inference
//!
//! The simulator only sees the `Classifier` trait, so the exported forest can
//! be swapped for any other binary model.

pub mod forest;
pub mod inference;

// Re-export common types
pub use forest::{ForestModel, TreeNode};
pub use inference::{Classifier, ClassifierError, TrafficLabel};
