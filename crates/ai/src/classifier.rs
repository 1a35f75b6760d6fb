use serde::{Deserialize, Serialize};
use smartcore::cluster::kmeans::{KMeans, KMeansParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use smartstock_core::{EquipmentState, MetricReading, UsageFeatures};

use crate::dataset;
use crate::model::TrainableModel;
use crate::result::AiError;
use crate::scaler::FeatureScaler;

type Clusters = KMeans<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Mean feature values of one cluster, in original units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCentroid {
    pub cluster: usize,
    pub size: usize,
    pub features: UsageFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub rows_used: usize,
    pub k: usize,
    pub centroids: Vec<ClusterCentroid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateClassification {
    pub cluster: usize,
    pub estimated_state: EquipmentState,
    /// Always true: cluster indices are arbitrary, so `estimated_state` is the
    /// label at that index and does not necessarily track severity.
    pub mapping_is_positional: bool,
}

/// Label at `cluster` in Novo, Bom, Atenção, Crítico order; indices past the
/// end map to the last label.
pub fn state_for_cluster(cluster: usize) -> EquipmentState {
    let labels = EquipmentState::ALL;
    labels[cluster.min(labels.len() - 1)]
}

struct Fitted {
    scaler: FeatureScaler,
    clusters: Clusters,
}

/// Unsupervised state estimator: k-means over standardized usage features.
pub struct StateClassifier {
    k: usize,
    max_iter: usize,
    fitted: Option<Fitted>,
}

impl core::fmt::Debug for StateClassifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateClassifier")
            .field("k", &self.k)
            .field("max_iter", &self.max_iter)
            .field("trained", &self.fitted.is_some())
            .finish()
    }
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new(EquipmentState::ALL.len())
    }
}

impl StateClassifier {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            fitted: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl TrainableModel for StateClassifier {
    type Dataset = [MetricReading];
    type Input = UsageFeatures;
    type Output = StateClassification;
    type Report = ClusterReport;

    fn name(&self) -> &'static str {
        "state_classifier"
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn train(&mut self, data: &[MetricReading]) -> Result<ClusterReport, AiError> {
        if self.k == 0 {
            return Err(AiError::invalid_input("k must be >= 1"));
        }
        let rows = dataset::complete_rows(data);
        let n = rows.features.len();
        if n < self.k {
            return Err(AiError::invalid_input(format!(
                "need at least k={} complete rows, got {n}",
                self.k
            )));
        }

        let scaler = FeatureScaler::fit(&rows.features)?;
        let m = dataset::matrix(&scaler.transform_all(&rows.features)?)?;
        let params = KMeansParameters::default()
            .with_k(self.k)
            .with_max_iter(self.max_iter);
        let clusters = Clusters::fit(&m, params).map_err(AiError::training)?;
        let labels = clusters.predict(&m).map_err(AiError::inference)?;

        let centroids = centroids(self.k, &rows.features, &labels);

        info!(
            model = self.name(),
            rows = n,
            k = self.k,
            "model trained"
        );

        self.fitted = Some(Fitted { scaler, clusters });
        Ok(ClusterReport {
            rows_used: n,
            k: self.k,
            centroids,
        })
    }

    fn predict(&self, input: &UsageFeatures) -> Result<StateClassification, AiError> {
        let fitted = self.fitted.as_ref().ok_or(AiError::NotReady(self.name()))?;
        let scaled = fitted.scaler.transform(&input.to_vec())?;
        let m = dataset::matrix(&[scaled])?;
        let cluster = fitted
            .clusters
            .predict(&m)
            .map_err(AiError::inference)?
            .first()
            .copied()
            .ok_or_else(|| AiError::inference("no cluster returned"))? as usize;

        Ok(StateClassification {
            cluster,
            estimated_state: state_for_cluster(cluster),
            mapping_is_positional: true,
        })
    }
}

/// Per-cluster feature means in original units. Empty clusters get zeros.
fn centroids(k: usize, rows: &[Vec<f64>], labels: &[u32]) -> Vec<ClusterCentroid> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; width]; k];
    let mut sizes = vec![0usize; k];
    for (row, &label) in rows.iter().zip(labels) {
        let c = label as usize;
        if c >= k {
            continue;
        }
        sizes[c] += 1;
        for (s, v) in sums[c].iter_mut().zip(row) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(sizes)
        .enumerate()
        .map(|(cluster, (sum, size))| {
            let mean: Vec<f64> = sum
                .iter()
                .map(|s| if size > 0 { s / size as f64 } else { 0.0 })
                .collect();
            ClusterCentroid {
                cluster,
                size,
                features: UsageFeatures {
                    temperature_c: mean.first().copied().unwrap_or(0.0),
                    cpu_percent: mean.get(1).copied().unwrap_or(0.0),
                    ram_percent: mean.get(2).copied().unwrap_or(0.0),
                    disk_percent: mean.get(3).copied().unwrap_or(0.0),
                    failure_count: mean.get(4).copied().unwrap_or(0.0),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn predict_before_train_is_not_ready() {
        let model = StateClassifier::default();
        assert_eq!(
            model.predict(&UsageFeatures::default()).unwrap_err(),
            AiError::NotReady("state_classifier")
        );
    }

    #[test]
    fn reports_one_centroid_per_cluster() {
        let mut model = StateClassifier::default();
        let report = model.train(&testing::training_metrics(21, 25)).unwrap();
        assert_eq!(report.k, 4);
        assert_eq!(report.rows_used, 100);
        assert_eq!(report.centroids.len(), 4);
        assert_eq!(report.centroids.iter().map(|c| c.size).sum::<usize>(), 100);

        // Centroids are in original units, so they stay within generated ranges.
        for c in report.centroids.iter().filter(|c| c.size > 0) {
            assert!((30.0..=60.0).contains(&c.features.temperature_c));
            assert!((0.0..=100.0).contains(&c.features.cpu_percent));
        }
    }

    #[test]
    fn prediction_is_positional_and_idempotent() {
        let mut model = StateClassifier::default();
        model.train(&testing::training_metrics(8, 20)).unwrap();
        let input = UsageFeatures {
            temperature_c: 50.0,
            cpu_percent: 80.0,
            ram_percent: 85.0,
            disk_percent: 90.0,
            failure_count: 7.0,
        };
        let a = model.predict(&input).unwrap();
        assert!(a.cluster < 4);
        assert!(a.mapping_is_positional);
        assert_eq!(a.estimated_state, state_for_cluster(a.cluster));
        assert_eq!(a, model.predict(&input).unwrap());
    }

    #[test]
    fn rejects_too_few_rows() {
        let mut model = StateClassifier::new(4);
        let data = testing::training_metrics(1, 1);
        assert!(model.train(&data[..3]).is_err());
        assert!(StateClassifier::new(0).train(&data).is_err());
        assert!(!model.is_trained());
    }

    #[test]
    fn cluster_labels_clamp_to_last_state() {
        assert_eq!(state_for_cluster(0), EquipmentState::New);
        assert_eq!(state_for_cluster(3), EquipmentState::Critical);
        assert_eq!(state_for_cluster(9), EquipmentState::Critical);
    }

    #[test]
    fn centroid_means_ignore_other_clusters() {
        let rows = vec![vec![1.0; 5], vec![3.0; 5], vec![10.0; 5]];
        let cs = centroids(2, &rows, &[0, 0, 1]);
        assert_eq!(cs[0].size, 2);
        assert_eq!(cs[0].features.cpu_percent, 2.0);
        assert_eq!(cs[1].features.failure_count, 10.0);
    }
}
