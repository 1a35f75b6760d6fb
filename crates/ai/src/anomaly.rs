use serde::{Deserialize, Serialize};
use tracing::info;

use smartstock_core::{MetricReading, UsageFeatures};

use crate::dataset;
use crate::isolation_forest::{IsolationForest, IsolationForestParams};
use crate::model::TrainableModel;
use crate::result::{AiError, Severity};
use crate::scaler::FeatureScaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub rows_used: usize,
    pub rows_dropped: usize,
    /// Training rows scored below the decision offset.
    pub anomalies: usize,
    pub anomaly_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPrediction {
    pub is_anomaly: bool,
    /// Negated isolation score in \[-1, 0\]; lower is more anomalous.
    pub score: f64,
    pub severity: Severity,
}

/// Severity for a raw score: < -0.5 High, < -0.2 Medium, else Low.
pub fn severity_for_score(score: f64) -> Severity {
    if score < -0.5 {
        Severity::High
    } else if score < -0.2 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    scaler: FeatureScaler,
    forest: IsolationForest,
}

/// Unsupervised outlier detector over the five usage features.
///
/// Model:
/// - Standardize features.
/// - Fit an [`IsolationForest`] (100 trees, subsample 256, contamination 0.1).
/// - A reading is anomalous when its score falls below the forest's offset.
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    params: IsolationForestParams,
    fitted: Option<Fitted>,
}

impl AnomalyDetector {
    pub fn new(params: IsolationForestParams) -> Self {
        Self { params, fitted: None }
    }
}

impl TrainableModel for AnomalyDetector {
    type Dataset = [MetricReading];
    type Input = UsageFeatures;
    type Output = AnomalyPrediction;
    type Report = AnomalyReport;

    fn name(&self) -> &'static str {
        "anomaly_detector"
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn train(&mut self, data: &[MetricReading]) -> Result<AnomalyReport, AiError> {
        let rows = dataset::complete_rows(data);
        if rows.features.is_empty() {
            return Err(AiError::invalid_input("no complete rows to train on"));
        }

        let scaler = FeatureScaler::fit(&rows.features)?;
        let scaled = scaler.transform_all(&rows.features)?;
        let forest = IsolationForest::fit(&scaled, &self.params)?;

        let mut anomalies = 0;
        for row in &scaled {
            if forest.is_outlier(row)? {
                anomalies += 1;
            }
        }

        let report = AnomalyReport {
            rows_used: scaled.len(),
            rows_dropped: rows.dropped,
            anomalies,
            anomaly_fraction: anomalies as f64 / scaled.len() as f64,
        };

        info!(
            model = self.name(),
            rows = report.rows_used,
            anomalies,
            "model trained"
        );

        self.fitted = Some(Fitted { scaler, forest });
        Ok(report)
    }

    fn predict(&self, input: &UsageFeatures) -> Result<AnomalyPrediction, AiError> {
        let fitted = self.fitted.as_ref().ok_or(AiError::NotReady(self.name()))?;
        let scaled = fitted.scaler.transform(&input.to_vec())?;
        let score = fitted.forest.score_samples(&scaled)?;
        Ok(AnomalyPrediction {
            is_anomaly: score < fitted.forest.offset(),
            score,
            severity: severity_for_score(score),
        })
    }
}
