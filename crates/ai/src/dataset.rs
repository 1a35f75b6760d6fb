//! Feature extraction shared by the metric-trained models.

use rand::Rng;
use rand::seq::SliceRandom;
use smartcore::linalg::basic::matrix::DenseMatrix;

use smartstock_core::{EquipmentState, MetricReading};

use crate::result::AiError;

/// Complete rows of a metrics dataset.
pub(crate) struct Rows {
    pub features: Vec<Vec<f64>>,
    pub states: Vec<EquipmentState>,
    pub dropped: usize,
}

/// Keep only readings whose every feature is present (finite).
pub(crate) fn complete_rows(metrics: &[MetricReading]) -> Rows {
    let mut features = Vec::with_capacity(metrics.len());
    let mut states = Vec::with_capacity(metrics.len());
    for m in metrics {
        let f = m.features();
        if f.is_complete() {
            features.push(f.to_vec());
            states.push(m.state);
        }
    }
    let dropped = metrics.len() - features.len();
    Rows {
        features,
        states,
        dropped,
    }
}

/// Shuffled train/test index split; the test side gets `ceil(n * fraction)`
/// rows, bounded so both sides stay non-empty.
pub(crate) fn split_indices<R: Rng + ?Sized>(
    n: usize,
    test_fraction: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(rng);
    if n < 2 {
        return (idx, Vec::new());
    }
    let test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n.saturating_sub(1));
    let train = idx.split_off(test);
    (train, idx)
}

pub(crate) fn matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, AiError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(AiError::inference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use smartstock_core::EquipmentId;

    fn reading(cpu: f64) -> MetricReading {
        MetricReading {
            equipment_id: EquipmentId::new(1),
            timestamp: Utc::now(),
            temperature_c: 40.0,
            cpu_percent: cpu,
            ram_percent: 30.0,
            disk_percent: 20.0,
            battery_health_percent: None,
            failure_count: 0,
            state: EquipmentState::Good,
        }
    }

    #[test]
    fn drops_rows_with_missing_features() {
        let rows = complete_rows(&[reading(20.0), reading(f64::NAN), reading(30.0)]);
        assert_eq!(rows.features.len(), 2);
        assert_eq!(rows.states.len(), 2);
        assert_eq!(rows.dropped, 1);
    }

    #[test]
    fn split_holds_out_a_fifth_rounded_up() {
        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = split_indices(11, 0.2, &mut rng);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn split_keeps_both_sides_non_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = split_indices(2, 0.2, &mut rng);
        assert_eq!((train.len(), test.len()), (1, 1));
    }
}
