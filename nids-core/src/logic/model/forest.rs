//! Random Forest - inference over an exported tree ensemble
//!
//! Trees arrive as flat node arrays (the layout scikit-learn keeps in
//! `tree_`), so the training side only has to dump `children_left`,
//! `children_right`, `feature`, `threshold`, `impurity`, `n_node_samples`
//! and `value` per tree.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::{Classifier, ClassifierError, TrafficLabel};
use crate::error::{NidsError, NidsResult};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One node of a decision tree. Leaves have no feature and no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    /// Gini impurity at this node
    #[serde(default)]
    pub impurity: f64,
    /// Training samples that reached this node
    #[serde(default)]
    pub samples: u64,
    /// Per-class weight `[normal, attack]`
    pub value: [f64; 2],
}

impl TreeNode {
    pub fn leaf(value: [f64; 2]) -> Self {
        Self {
            feature: None,
            threshold: 0.0,
            left: None,
            right: None,
            impurity: 0.0,
            samples: 0,
            value,
        }
    }

    pub fn split(feature: usize, threshold: f32, left: usize, right: usize) -> Self {
        Self {
            feature: Some(feature),
            threshold,
            left: Some(left),
            right: Some(right),
            impurity: 0.0,
            samples: 0,
            value: [0.0, 0.0],
        }
    }

    pub fn with_stats(mut self, impurity: f64, samples: u64) -> Self {
        self.impurity = impurity;
        self.samples = samples;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.feature.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Walk to the leaf for `row`. Relies on `validate` having run: children
    /// always point forward, so the walk terminates.
    fn leaf_for(&self, row: &[f32]) -> &TreeNode {
        let mut node = &self.nodes[0];
        while let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right) {
            let next = if row[feature] <= node.threshold { left } else { right };
            node = &self.nodes[next];
        }
        node
    }

    fn predict_proba(&self, row: &[f32]) -> [f64; 2] {
        let value = self.leaf_for(row).value;
        let total = value[0] + value[1];
        [value[0] / total, value[1] / total]
    }

    fn validate(&self, tree: usize, n_features: usize) -> NidsResult<()> {
        let invalid = |msg: String| NidsError::InvalidModel(format!("tree {}: {}", tree, msg));

        if self.nodes.is_empty() {
            return Err(invalid("no nodes".to_string()));
        }

        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match (node.feature, node.left, node.right) {
                (Some(feature), Some(left), Some(right)) => {
                    if feature >= n_features {
                        return Err(invalid(format!(
                            "node {} splits on feature {} of {}",
                            idx, feature, n_features
                        )));
                    }
                    if !node.threshold.is_finite() {
                        return Err(invalid(format!("node {} has a non-finite threshold", idx)));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(invalid(format!(
                                "node {} points to child {} (nodes: {})",
                                idx, child, len
                            )));
                        }
                    }
                }
                (None, None, None) => {
                    let [normal, attack] = node.value;
                    let well_formed = normal.is_finite() && attack.is_finite() && normal >= 0.0 && attack >= 0.0;
                    if !well_formed || normal + attack <= 0.0 {
                        return Err(invalid(format!("leaf {} has class values {:?}", idx, node.value)));
                    }
                }
                _ => return Err(invalid(format!("node {} is only partially split", idx))),
            }
        }

        Ok(())
    }

    /// Mean decrease in impurity per feature, normalized to sum 1
    fn feature_importances(&self, n_features: usize) -> Vec<f64> {
        let mut importances = vec![0.0; n_features];

        for node in &self.nodes {
            if let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right) {
                let left = &self.nodes[left];
                let right = &self.nodes[right];
                let decrease = node.samples as f64 * node.impurity
                    - left.samples as f64 * left.impurity
                    - right.samples as f64 * right.impurity;
                importances[feature] += decrease;
            }
        }

        normalize(&mut importances);
        importances
    }
}

fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}

// ============================================================================
// FOREST
// ============================================================================

/// On-disk layout of the model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestArtifact {
    #[serde(default)]
    feature_names: Vec<String>,
    #[serde(default)]
    n_features: Option<usize>,
    trees: Vec<DecisionTree>,
}

/// Random forest classifier. Probabilities are the mean of the per-tree leaf
/// class distributions, as scikit-learn computes them.
#[derive(Debug, Clone)]
pub struct ForestModel {
    feature_names: Vec<String>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl ForestModel {
    pub fn new(feature_names: Vec<String>, n_features: usize, trees: Vec<DecisionTree>) -> NidsResult<Self> {
        if trees.is_empty() {
            return Err(NidsError::InvalidModel("forest has no trees".to_string()));
        }
        if n_features == 0 {
            return Err(NidsError::InvalidModel("forest has no features".to_string()));
        }
        if !feature_names.is_empty() && feature_names.len() != n_features {
            return Err(NidsError::InvalidModel(format!(
                "{} feature names for {} features",
                feature_names.len(),
                n_features
            )));
        }

        for (idx, tree) in trees.iter().enumerate() {
            tree.validate(idx, n_features)?;
        }

        Ok(Self {
            feature_names,
            n_features,
            trees,
        })
    }

    pub fn from_json(json: &str) -> NidsResult<Self> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    /// Load the JSON model artifact
    pub fn load(path: impl AsRef<Path>) -> NidsResult<Self> {
        let path = path.as_ref();
        log::info!("Loading forest model from: {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let model = Self::from_artifact(serde_json::from_reader(reader)?)?;

        log::info!(
            "Forest model loaded: {} trees over {} features",
            model.n_trees(),
            model.n_features
        );
        Ok(model)
    }

    fn from_artifact(artifact: ForestArtifact) -> NidsResult<Self> {
        let n_features = match artifact.n_features {
            Some(n) => n,
            None => artifact.feature_names.len(),
        };
        Self::new(artifact.feature_names, n_features, artifact.trees)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Name of feature `idx`, falling back to its position
    pub fn feature_name(&self, idx: usize) -> String {
        self.feature_names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("feature_{}", idx))
    }

    pub fn feature_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (sum, value) in total.iter_mut().zip(tree.feature_importances(self.n_features)) {
                *sum += value;
            }
        }

        let n_trees = self.trees.len() as f64;
        total.iter_mut().for_each(|v| *v /= n_trees);
        normalize(&mut total);
        total
    }

    fn check_width(&self, row: &[f32]) -> Result<(), ClassifierError> {
        if row.len() != self.n_features {
            return Err(ClassifierError(format!(
                "row has {} features, model expects {}",
                row.len(),
                self.n_features
            )));
        }
        Ok(())
    }
}

impl Classifier for ForestModel {
    fn predict(&self, row: &[f32]) -> Result<TrafficLabel, ClassifierError> {
        let [normal, attack] = self.predict_proba(row)?;
        Ok(if attack > normal {
            TrafficLabel::Attack
        } else {
            TrafficLabel::Normal
        })
    }

    fn predict_proba(&self, row: &[f32]) -> Result<[f64; 2], ClassifierError> {
        self.check_width(row)?;

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [normal, attack] = tree.predict_proba(row);
            sum[0] += normal;
            sum[1] += attack;
        }

        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

// ============================================================================
// TESTS
// ============================================================================
