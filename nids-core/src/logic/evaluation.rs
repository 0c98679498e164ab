//! Offline evaluation of the classifier on a labeled pool
//!
//! Accuracy, per-class precision/recall/F1 and the forest's most important
//! features. Runs once at startup, before any live simulation.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::model::{Classifier, ForestModel, TrafficLabel};
use super::pool::SamplePool;
use crate::error::{NidsError, NidsResult};

const CLASS_NAMES: [&str; 2] = ["normal", "attack"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    /// `confusion[actual][predicted]`
    pub confusion: [[usize; 2]; 2],
    pub classes: [ClassMetrics; 2],
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Score every pool row and compare against its ground-truth label
pub fn evaluate(classifier: &dyn Classifier, pool: &SamplePool) -> NidsResult<EvaluationReport> {
    let labels = pool.labels().ok_or(NidsError::Unlabeled)?;

    let mut confusion = [[0usize; 2]; 2];
    for (index, (row, &label)) in pool.rows().zip(labels).enumerate() {
        let actual = TrafficLabel::from_class(label).ok_or(NidsError::InvalidLabel { index, value: label })?;
        let predicted = classifier.predict(row)?;
        confusion[actual.class_index()][predicted.class_index()] += 1;
    }

    let total = pool.len();
    let correct = confusion[0][0] + confusion[1][1];

    let classes = [0, 1].map(|c| {
        let true_pos = confusion[c][c];
        let support = confusion[c][0] + confusion[c][1];
        let predicted = confusion[0][c] + confusion[1][c];
        let precision = ratio(true_pos, predicted);
        let recall = ratio(true_pos, support);
        ClassMetrics {
            precision,
            recall,
            f1: f1(precision, recall),
            support,
        }
    });

    let macro_avg = ClassMetrics {
        precision: (classes[0].precision + classes[1].precision) / 2.0,
        recall: (classes[0].recall + classes[1].recall) / 2.0,
        f1: (classes[0].f1 + classes[1].f1) / 2.0,
        support: total,
    };

    let weighted = |metric: fn(&ClassMetrics) -> f64| {
        if total == 0 {
            return 0.0;
        }
        classes
            .iter()
            .map(|m| metric(m) * m.support as f64)
            .sum::<f64>()
            / total as f64
    };
    let weighted_avg = ClassMetrics {
        precision: weighted(|m| m.precision),
        recall: weighted(|m| m.recall),
        f1: weighted(|m| m.f1),
        support: total,
    };

    Ok(EvaluationReport {
        accuracy: ratio(correct, total),
        confusion,
        classes,
        macro_avg,
        weighted_avg,
        total,
    })
}

/// The `k` features with the highest mean decrease in impurity
pub fn top_features(model: &ForestModel, k: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<(usize, f64)> = model.feature_importances().into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .take(k)
        .map(|(idx, importance)| FeatureImportance {
            name: model.feature_name(idx),
            importance,
        })
        .collect()
}

fn write_metrics(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f)?;
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (name, metrics) in CLASS_NAMES.iter().zip(&self.classes) {
            write_metrics(f, name, metrics)?;
        }
        writeln!(f)?;
        writeln!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        write_metrics(f, "macro avg", &self.macro_avg)?;
        write_metrics(f, "weighted avg", &self.weighted_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::forest::{DecisionTree, TreeNode};
    use crate::logic::model::ClassifierError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    struct ThresholdClassifier(f32);

    impl Classifier for ThresholdClassifier {
        fn predict(&self, row: &[f32]) -> Result<TrafficLabel, ClassifierError> {
            Ok(if row[0] > self.0 {
                TrafficLabel::Attack
            } else {
                TrafficLabel::Normal
            })
        }

        fn predict_proba(&self, row: &[f32]) -> Result<[f64; 2], ClassifierError> {
            let attack = if row[0] > self.0 { 1.0 } else { 0.0 };
            Ok([1.0 - attack, attack])
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    fn labeled_pool(rows: &[(f32, u8)]) -> SamplePool {
        let (values, labels): (Vec<Vec<f32>>, Vec<u8>) = rows.iter().map(|&(v, l)| (vec![v], l)).unzip();
        SamplePool::from_rows(vec![], values, Some(labels)).unwrap()
    }

    #[test]
    fn test_metrics_from_confusion() {
        let pool = labeled_pool(&[(0.9, 1), (0.8, 1), (0.2, 1), (0.1, 0), (0.7, 0), (0.3, 0)]);
        let report = evaluate(&ThresholdClassifier(0.5), &pool).unwrap();

        assert_eq!(report.confusion, [[2, 1], [1, 2]]);
        assert_eq!(report.total, 6);
        assert!(approx(report.accuracy, 4.0 / 6.0));

        let attack = report.classes[1];
        assert!(approx(attack.precision, 2.0 / 3.0));
        assert!(approx(attack.recall, 2.0 / 3.0));
        assert!(approx(attack.f1, 2.0 / 3.0));
        assert_eq!(attack.support, 3);
        assert!(approx(report.weighted_avg.f1, 2.0 / 3.0));
    }

    #[test]
    fn test_zero_division_yields_zero() {
        // never predicts attack
        let pool = labeled_pool(&[(0.1, 0), (0.2, 1)]);
        let report = evaluate(&ThresholdClassifier(5.0), &pool).unwrap();

        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
        assert!(approx(report.classes[0].precision, 0.5));
        assert!(approx(report.accuracy, 0.5));
    }

    #[test]
    fn test_unlabeled_pool_rejected() {
        let pool = SamplePool::from_rows(vec![], vec![vec![0.0]], None).unwrap();
        let err = evaluate(&ThresholdClassifier(0.5), &pool).unwrap_err();
        assert!(matches!(err, NidsError::Unlabeled));
    }

    #[test]
    fn test_report_renders_table() {
        let pool = labeled_pool(&[(0.9, 1), (0.1, 0), (0.7, 0)]);
        let text = evaluate(&ThresholdClassifier(0.5), &pool).unwrap().to_string();

        assert!(text.starts_with("Model Accuracy: 66.67%"));
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("attack"));
    }

    #[test]
    fn test_top_features_ranked() {
        let tree = DecisionTree::new(vec![
            TreeNode::split(2, 1.0, 1, 2).with_stats(0.5, 100),
            TreeNode::split(0, 3.0, 3, 4).with_stats(0.3, 60),
            TreeNode::leaf([0.0, 40.0]).with_stats(0.0, 40),
            TreeNode::leaf([50.0, 0.0]).with_stats(0.0, 50),
            TreeNode::leaf([0.0, 10.0]).with_stats(0.0, 10),
        ]);
        let names = ["duration", "protocol_type", "src_bytes"].map(String::from).to_vec();
        let model = ForestModel::new(names, 3, vec![tree]).unwrap();

        let top = top_features(&model, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "src_bytes");
        assert_eq!(top[1].name, "duration");
        assert!(top[0].importance > top[1].importance);
    }
}
