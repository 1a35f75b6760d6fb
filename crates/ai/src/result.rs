use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    /// `predict` was called before `train`.
    #[error("model not ready: {0} must be trained before predicting")]
    NotReady(&'static str),

    #[error("invalid model input: {0}")]
    InvalidInput(String),

    #[error("training failed: {0}")]
    TrainingFailed(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

impl AiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn training(err: impl core::fmt::Display) -> Self {
        Self::TrainingFailed(err.to_string())
    }

    pub(crate) fn inference(err: impl core::fmt::Display) -> Self {
        Self::InferenceFailed(err.to_string())
    }
}

/// Three-tier severity shared by the maintenance risk and anomaly outputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        })
    }
}

/// Per-class evaluation metrics on a held-out set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// Metrics for `class` given parallel actual/predicted label slices.
    ///
    /// Undefined ratios (no predictions or no support) are reported as 0.
    pub fn for_class(label: impl Into<String>, class: u32, actual: &[u32], predicted: &[u32]) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a == class, p == class) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            label: label.into(),
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_metrics_count_confusion_cells() {
        let actual = [1, 1, 0, 0, 1];
        let predicted = [1, 0, 0, 1, 1];
        let m = ClassMetrics::for_class("needs", 1, &actual, &predicted);
        assert_eq!(m.support, 3);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn class_metrics_without_predictions_are_zero() {
        let m = ClassMetrics::for_class("needs", 1, &[1, 1], &[0, 0]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
    }

    #[test]
    fn not_ready_names_the_model() {
        let msg = AiError::NotReady("predictive_maintenance").to_string();
        assert!(msg.contains("predictive_maintenance"));
    }
}
