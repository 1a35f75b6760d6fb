use crate::result::AiError;

/// Per-feature standardization (zero mean, unit variance).
///
/// Uses the population standard deviation; constant features keep a scale of
/// 1 so they map to 0 instead of dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl FeatureScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, AiError> {
        let first = rows
            .first()
            .ok_or_else(|| AiError::invalid_input("cannot fit scaler on an empty dataset"))?;
        let width = first.len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(AiError::invalid_input("rows have inconsistent feature counts"));
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut scales = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in scales.iter_mut().zip(row).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut scales {
            *s = (*s / n).sqrt();
            if *s <= f64::EPSILON {
                *s = 1.0;
            }
        }

        Ok(Self { means, scales })
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, AiError> {
        if row.len() != self.width() {
            return Err(AiError::invalid_input(format!(
                "expected {} features, got {}",
                self.width(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, AiError> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn inverse_transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| v * s + m)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_each_column() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let s = FeatureScaler::fit(&rows).unwrap();
        assert_eq!(s.transform(&[1.0, 10.0]).unwrap(), vec![-1.0, 0.0]);
        assert_eq!(s.transform(&[3.0, 10.0]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn inverse_undoes_transform() {
        let rows = vec![vec![2.0, -4.0], vec![6.0, 8.0], vec![7.0, 1.0]];
        let s = FeatureScaler::fit(&rows).unwrap();
        let back = s.inverse_transform(&s.transform(&rows[2]).unwrap());
        for (a, b) in back.iter().zip(&rows[2]) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert!(FeatureScaler::fit(&[]).is_err());
        assert!(FeatureScaler::fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        let s = FeatureScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(s.transform(&[1.0]).is_err());
    }
}
