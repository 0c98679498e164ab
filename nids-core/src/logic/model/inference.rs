//! Inference seam between the simulator and the trained model

use thiserror::Error;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Binary NSL-KDD target: every non-`normal` label is an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLabel {
    Normal,
    Attack,
}

impl TrafficLabel {
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(TrafficLabel::Normal),
            1 => Some(TrafficLabel::Attack),
            _ => None,
        }
    }

    pub fn class_index(&self) -> usize {
        match self {
            TrafficLabel::Normal => 0,
            TrafficLabel::Attack => 1,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, TrafficLabel::Attack)
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
#[error("classifier error: {0}")]
pub struct ClassifierError(pub String);

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A trained binary classifier over fixed-width feature rows.
///
/// Implementations must be total over rows of the width they were trained
/// on; an error means the row or the model is broken, not "benign".
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f32]) -> Result<TrafficLabel, ClassifierError>;

    /// Class probabilities `[p_normal, p_attack]`
    fn predict_proba(&self, row: &[f32]) -> Result<[f64; 2], ClassifierError>;

    fn n_features(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(TrafficLabel::from_class(0), Some(TrafficLabel::Normal));
        assert_eq!(TrafficLabel::from_class(1), Some(TrafficLabel::Attack));
        assert_eq!(TrafficLabel::from_class(7), None);
        assert_eq!(TrafficLabel::Attack.class_index(), 1);
        assert!(!TrafficLabel::Normal.is_attack());
    }
}
