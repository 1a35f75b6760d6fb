use core::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use tracing::info;

use smartstock_core::{FEATURE_NAMES, MetricReading, UsageFeatures};

use crate::dataset;
use crate::model::TrainableModel;
use crate::result::{AiError, ClassMetrics, Severity};
use crate::scaler::FeatureScaler;

type Tree = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

const HEALTHY: u32 = 0;
const NEEDS_MAINTENANCE: u32 = 1;
/// Shuffles averaged per feature when measuring importance.
const PERMUTATION_REPEATS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceConfig {
    /// Number of bootstrap-trained trees in the ensemble.
    pub n_trees: usize,
    pub max_depth: u16,
    /// Share of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seeds the train/test split and the bootstrap samples.
    pub seed: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            n_trees: 50,
            max_depth: 8,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Training summary of [`PredictiveMaintenance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Accuracy on the held-out rows.
    pub accuracy: f64,
    /// Precision/recall breakdown for "healthy" and "needs maintenance".
    pub classes: Vec<ClassMetrics>,
    /// Held-out accuracy lost when each feature is shuffled, most important
    /// first.
    pub feature_importances: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    pub needs_maintenance: bool,
    /// Share of trees voting "needs maintenance", in \[0, 1\].
    pub failure_probability: f64,
    pub risk: Severity,
}

/// Risk tier for a failure probability: >0.7 High, >0.4 Medium, else Low.
pub fn risk_for_probability(p: f64) -> Severity {
    if p > 0.7 {
        Severity::High
    } else if p > 0.4 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Coarse months-to-failure band for a failure probability.
pub fn months_to_failure_band(p: f64) -> Range<u32> {
    if p > 0.8 {
        1..3
    } else if p > 0.6 {
        3..6
    } else if p > 0.4 {
        6..12
    } else {
        12..36
    }
}

/// One ensemble member. A bootstrap sample holding a single class cannot fit
/// a tree, so it votes for that class unconditionally.
enum Voter {
    Tree(Box<Tree>),
    Constant(u32),
}

impl Voter {
    fn fit(x: &[Vec<f64>], y: Vec<u32>, max_depth: u16) -> Result<Self, AiError> {
        let first = y.first().copied().unwrap_or(HEALTHY);
        if y.iter().all(|&c| c == first) {
            return Ok(Voter::Constant(first));
        }
        let m = dataset::matrix(x)?;
        let params = DecisionTreeClassifierParameters::default().with_max_depth(max_depth);
        let tree = DecisionTreeClassifier::fit(&m, &y, params).map_err(AiError::training)?;
        Ok(Voter::Tree(Box::new(tree)))
    }

    fn predict(&self, m: &DenseMatrix<f64>, rows: usize) -> Result<Vec<u32>, AiError> {
        match self {
            Voter::Tree(t) => t.predict(m).map_err(AiError::inference),
            Voter::Constant(c) => Ok(vec![*c; rows]),
        }
    }
}

struct Fitted {
    scaler: FeatureScaler,
    voters: Vec<Voter>,
}

impl Fitted {
    /// Fraction of voters predicting "needs maintenance", per scaled row.
    fn probabilities(&self, scaled: &[Vec<f64>]) -> Result<Vec<f64>, AiError> {
        let m = dataset::matrix(scaled)?;
        let mut votes = vec![0usize; scaled.len()];
        for voter in &self.voters {
            for (v, class) in votes.iter_mut().zip(voter.predict(&m, scaled.len())?) {
                if class == NEEDS_MAINTENANCE {
                    *v += 1;
                }
            }
        }
        let n = self.voters.len().max(1) as f64;
        Ok(votes.into_iter().map(|v| v as f64 / n).collect())
    }

    fn accuracy(&self, scaled: &[Vec<f64>], labels: &[u32]) -> Result<f64, AiError> {
        if labels.is_empty() {
            return Ok(0.0);
        }
        let correct = self
            .probabilities(scaled)?
            .into_iter()
            .zip(labels)
            .filter(|(p, y)| (*p > 0.5) == (**y == NEEDS_MAINTENANCE))
            .count();
        Ok(correct as f64 / labels.len() as f64)
    }

    /// Permutation importance on the held-out rows, sorted descending.
    /// Negative drops are reported as 0.
    fn feature_importances<R: Rng + ?Sized>(
        &self,
        scaled: &[Vec<f64>],
        labels: &[u32],
        rng: &mut R,
    ) -> Result<Vec<(String, f64)>, AiError> {
        let baseline = self.accuracy(scaled, labels)?;
        let mut out = Vec::with_capacity(FEATURE_NAMES.len());
        for (j, name) in FEATURE_NAMES.iter().enumerate() {
            let mut lost = 0.0;
            for _ in 0..PERMUTATION_REPEATS {
                let mut column: Vec<f64> = scaled.iter().map(|r| r[j]).collect();
                column.shuffle(rng);
                let permuted: Vec<Vec<f64>> = scaled
                    .iter()
                    .zip(column)
                    .map(|(row, v)| {
                        let mut row = row.clone();
                        row[j] = v;
                        row
                    })
                    .collect();
                lost += baseline - self.accuracy(&permuted, labels)?;
            }
            out.push((name.to_string(), (lost / PERMUTATION_REPEATS as f64).max(0.0)));
        }
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(out)
    }
}

/// Predictive-maintenance classifier.
///
/// Labels each reading 1 when its state is Atenção or Crítico, standardizes
/// the five usage features and fits a bagged ensemble of decision trees.
pub struct PredictiveMaintenance {
    config: MaintenanceConfig,
    fitted: Option<Fitted>,
}

impl core::fmt::Debug for PredictiveMaintenance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PredictiveMaintenance")
            .field("config", &self.config)
            .field("trained", &self.fitted.is_some())
            .finish()
    }
}

impl Default for PredictiveMaintenance {
    fn default() -> Self {
        Self::new(MaintenanceConfig::default())
    }
}

impl PredictiveMaintenance {
    pub fn new(config: MaintenanceConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Sample an expected months-to-failure from the band matching the
    /// predicted failure probability. Deliberately coarse; not a regression.
    pub fn estimate_months_to_failure<R: Rng + ?Sized>(
        &self,
        features: &UsageFeatures,
        rng: &mut R,
    ) -> Result<u32, AiError> {
        let p = self.predict(features)?.failure_probability;
        Ok(rng.random_range(months_to_failure_band(p)))
    }
}

impl TrainableModel for PredictiveMaintenance {
    type Dataset = [MetricReading];
    type Input = UsageFeatures;
    type Output = MaintenancePrediction;
    type Report = MaintenanceReport;

    fn name(&self) -> &'static str {
        "predictive_maintenance"
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn train(&mut self, data: &[MetricReading]) -> Result<MaintenanceReport, AiError> {
        let rows = dataset::complete_rows(data);
        let n = rows.features.len();
        if n < 2 {
            return Err(AiError::invalid_input(format!(
                "need at least 2 complete rows to train, got {n}"
            )));
        }
        if self.config.n_trees == 0 {
            return Err(AiError::invalid_input("n_trees must be >= 1"));
        }

        let labels: Vec<u32> = rows
            .states
            .iter()
            .map(|s| if s.needs_maintenance() { NEEDS_MAINTENANCE } else { HEALTHY })
            .collect();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (train_idx, test_idx) = dataset::split_indices(n, self.config.test_fraction, &mut rng);

        let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows.features[i].clone()).collect();
        let train_y: Vec<u32> = train_idx.iter().map(|&i| labels[i]).collect();

        let scaler = FeatureScaler::fit(&train_x)?;
        let scaled = scaler.transform_all(&train_x)?;

        let mut voters = Vec::with_capacity(self.config.n_trees);
        for _ in 0..self.config.n_trees {
            let sample: Vec<usize> = (0..scaled.len())
                .map(|_| rng.random_range(0..scaled.len()))
                .collect();
            let bx: Vec<Vec<f64>> = sample.iter().map(|&i| scaled[i].clone()).collect();
            let by: Vec<u32> = sample.iter().map(|&i| train_y[i]).collect();
            voters.push(Voter::fit(&bx, by, self.config.max_depth)?);
        }

        let fitted = Fitted { scaler, voters };

        let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| rows.features[i].clone()).collect();
        let test_y: Vec<u32> = test_idx.iter().map(|&i| labels[i]).collect();
        let test_scaled = fitted.scaler.transform_all(&test_x)?;
        let predicted: Vec<u32> = fitted
            .probabilities(&test_scaled)?
            .into_iter()
            .map(|p| if p > 0.5 { NEEDS_MAINTENANCE } else { HEALTHY })
            .collect();

        let correct = predicted.iter().zip(&test_y).filter(|(p, a)| p == a).count();
        let accuracy = correct as f64 / test_y.len() as f64;

        let report = MaintenanceReport {
            rows_used: n,
            rows_dropped: rows.dropped,
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            accuracy,
            classes: vec![
                ClassMetrics::for_class("healthy", HEALTHY, &test_y, &predicted),
                ClassMetrics::for_class("needs_maintenance", NEEDS_MAINTENANCE, &test_y, &predicted),
            ],
            feature_importances: fitted.feature_importances(&test_scaled, &test_y, &mut rng)?,
        };

        info!(
            model = self.name(),
            rows = n,
            dropped = rows.dropped,
            accuracy = report.accuracy,
            importances = ?report.feature_importances,
            "model trained"
        );

        self.fitted = Some(fitted);
        Ok(report)
    }

    fn predict(&self, input: &UsageFeatures) -> Result<MaintenancePrediction, AiError> {
        let fitted = self.fitted.as_ref().ok_or(AiError::NotReady(self.name()))?;

        let scaled = fitted.scaler.transform(&input.to_vec())?;
        let p = fitted
            .probabilities(&[scaled])?
            .first()
            .copied()
            .ok_or_else(|| AiError::inference("no probability returned"))?;

        Ok(MaintenancePrediction {
            needs_maintenance: p > 0.5,
            failure_probability: p,
            risk: risk_for_probability(p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use proptest::{prop_assert, proptest};
    use smartstock_core::EquipmentState;

    fn small() -> MaintenanceConfig {
        MaintenanceConfig {
            n_trees: 15,
            ..MaintenanceConfig::default()
        }
    }

    fn critical() -> UsageFeatures {
        UsageFeatures {
            temperature_c: 55.0,
            cpu_percent: 85.0,
            ram_percent: 90.0,
            disk_percent: 95.0,
            failure_count: 8.0,
        }
    }

    fn healthy() -> UsageFeatures {
        UsageFeatures {
            temperature_c: 37.0,
            cpu_percent: 20.0,
            ram_percent: 30.0,
            disk_percent: 10.0,
            failure_count: 0.0,
        }
    }

    #[test]
    fn predict_before_train_is_not_ready() {
        let model = PredictiveMaintenance::default();
        let err = model.predict(&critical()).unwrap_err();
        assert_eq!(err, AiError::NotReady("predictive_maintenance"));
        assert!(!model.is_trained());
    }

    #[test]
    fn months_estimate_before_train_is_not_ready() {
        let model = PredictiveMaintenance::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            model.estimate_months_to_failure(&critical(), &mut rng),
            Err(AiError::NotReady(_))
        ));
    }

    #[test]
    fn training_separates_tiers() {
        let mut model = PredictiveMaintenance::new(small());
        let report = model.train(&testing::training_metrics(7, 30)).unwrap();

        assert!(model.is_trained());
        assert_eq!(report.rows_used, 120);
        assert_eq!(report.test_size, 24);
        assert_eq!(report.train_size, 96);
        assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);
        assert_eq!(report.classes.len(), 2);

        let bad = model.predict(&critical()).unwrap();
        assert!(bad.needs_maintenance);
        assert!(bad.failure_probability > 0.7);
        assert_eq!(bad.risk, Severity::High);

        let good = model.predict(&healthy()).unwrap();
        assert!(!good.needs_maintenance);
        assert_eq!(good.risk, Severity::Low);
    }

    #[test]
    fn importances_rank_every_feature() {
        let mut data = testing::training_metrics(7, 30);
        for m in &mut data {
            m.ram_percent = 50.0;
        }
        let mut model = PredictiveMaintenance::new(small());
        let report = model.train(&data).unwrap();

        let imp = &report.feature_importances;
        assert_eq!(imp.len(), FEATURE_NAMES.len());
        assert!(imp.iter().all(|(_, v)| *v >= 0.0));
        assert!(imp.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(imp[0].1 > 0.0, "{imp:?}");
        assert_ne!(imp[0].0, "ram_percent");

        let ram = imp.iter().find(|(name, _)| name == "ram_percent").unwrap();
        assert_eq!(ram.1, 0.0);
    }

    #[test]
    fn prediction_is_idempotent() {
        let mut model = PredictiveMaintenance::new(small());
        model.train(&testing::training_metrics(3, 20)).unwrap();
        let a = model.predict(&critical()).unwrap();
        let b = model.predict(&critical()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn incomplete_rows_are_dropped() {
        let mut data = testing::training_metrics(5, 10);
        data[0].temperature_c = f64::NAN;
        data[1].ram_percent = f64::INFINITY;
        let mut model = PredictiveMaintenance::new(small());
        let report = model.train(&data).unwrap();
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(report.rows_used, 38);
    }

    #[test]
    fn single_class_dataset_still_trains() {
        let data: Vec<_> = testing::training_metrics(9, 10)
            .into_iter()
            .filter(|m| m.state == EquipmentState::Critical)
            .collect();
        let mut model = PredictiveMaintenance::new(small());
        model.train(&data).unwrap();
        assert_eq!(model.predict(&healthy()).unwrap().failure_probability, 1.0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let mut model = PredictiveMaintenance::default();
        assert!(matches!(model.train(&[]), Err(AiError::InvalidInput(_))));
        assert!(!model.is_trained());
    }

    #[test]
    fn risk_tiers_use_strict_thresholds() {
        assert_eq!(risk_for_probability(0.71), Severity::High);
        assert_eq!(risk_for_probability(0.7), Severity::Medium);
        assert_eq!(risk_for_probability(0.41), Severity::Medium);
        assert_eq!(risk_for_probability(0.4), Severity::Low);
    }

    #[test]
    fn months_bands_do_not_overlap() {
        assert_eq!(months_to_failure_band(0.9), 1..3);
        assert_eq!(months_to_failure_band(0.7), 3..6);
        assert_eq!(months_to_failure_band(0.5), 6..12);
        assert_eq!(months_to_failure_band(0.1), 12..36);
    }

    #[test]
    fn months_estimate_falls_in_band() {
        let mut model = PredictiveMaintenance::new(small());
        model.train(&testing::training_metrics(4, 20)).unwrap();
        let p = model.predict(&critical()).unwrap().failure_probability;
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let months = model.estimate_months_to_failure(&critical(), &mut rng).unwrap();
            assert!(months_to_failure_band(p).contains(&months));
        }
    }

    proptest! {
        #[test]
        fn risk_is_monotonic_in_probability(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(risk_for_probability(lo) <= risk_for_probability(hi));
        }

        #[test]
        fn months_band_shrinks_as_probability_grows(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(months_to_failure_band(hi).start <= months_to_failure_band(lo).start);
        }
    }
}
