//! Isolation forest outlier scoring.
//!
//! Model:
//! - Each tree isolates a random subsample by recursive random splits
//!   (random feature, uniform threshold between its min and max).
//! - Outliers are isolated in fewer splits, so their mean path length is short.
//! - `score_samples` returns `-(2 ^ (-E[h(x)] / c(psi)))`, in \[-1, 0\]; lower is
//!   more anomalous.
//! - The decision offset is the `contamination` quantile of training scores.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::result::AiError;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq)]
pub struct IsolationForestParams {
    pub n_trees: usize,
    /// Subsample size per tree (capped at the dataset size).
    pub max_samples: usize,
    /// Expected share of outliers in the training data, in (0, 0.5].
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn path_length(&self, row: &[f64], depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] < *threshold {
                    left.path_length(row, depth + 1)
                } else {
                    right.path_length(row, depth + 1)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    width: usize,
    offset: f64,
}

impl IsolationForest {
    pub fn fit(rows: &[Vec<f64>], params: &IsolationForestParams) -> Result<Self, AiError> {
        let width = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| AiError::invalid_input("cannot fit isolation forest on an empty dataset"))?;
        if params.n_trees == 0 || params.max_samples == 0 {
            return Err(AiError::invalid_input("n_trees and max_samples must be >= 1"));
        }
        if !(params.contamination > 0.0 && params.contamination <= 0.5) {
            return Err(AiError::invalid_input("contamination must be in (0, 0.5]"));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let sample_size = params.max_samples.min(rows.len());
        let height_limit = (sample_size as f64).log2().ceil().max(0.0) as usize;

        let trees = (0..params.n_trees)
            .map(|_| {
                let sample: Vec<&[f64]> = index::sample(&mut rng, rows.len(), sample_size)
                    .into_iter()
                    .map(|i| rows[i].as_slice())
                    .collect();
                build(&mut rng, &sample, 0, height_limit)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            width,
            offset: 0.0,
        };

        let mut scores = rows
            .iter()
            .map(|r| forest.score_samples(r))
            .collect::<Result<Vec<f64>, AiError>>()?;
        scores.sort_by(f64::total_cmp);
        forest.offset = percentile(&scores, params.contamination);

        Ok(forest)
    }

    /// Negated isolation score in \[-1, 0\]; lower is more anomalous.
    pub fn score_samples(&self, row: &[f64]) -> Result<f64, AiError> {
        if row.len() != self.width {
            return Err(AiError::invalid_input(format!(
                "expected {} features, got {}",
                self.width,
                row.len()
            )));
        }
        let mean_path = self
            .trees
            .iter()
            .map(|t| t.path_length(row, 0))
            .sum::<f64>()
            / self.trees.len() as f64;
        let c = average_path_length(self.sample_size);
        let normalized = if c > 0.0 { mean_path / c } else { 0.0 };
        Ok(-(2f64.powf(-normalized)))
    }

    /// Scores below this value are flagged as outliers.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_outlier(&self, row: &[f64]) -> Result<bool, AiError> {
        Ok(self.score_samples(row)? < self.offset)
    }
}

fn build<R: Rng + ?Sized>(rng: &mut R, rows: &[&[f64]], depth: usize, height_limit: usize) -> Node {
    if depth >= height_limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Only features that still vary can split the node.
    let width = rows[0].len();
    let candidates: Vec<(usize, f64, f64)> = (0..width)
        .filter_map(|f| {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r[f]), hi.max(r[f]))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = candidates[rng.random_range(0..candidates.len())];
    let threshold = rng.random_range(lo..hi);

    let (left, right): (Vec<&[f64]>, Vec<&[f64]>) = rows.iter().partition(|r| r[feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build(rng, &left, depth + 1, height_limit)),
        right: Box::new(build(rng, &right, depth + 1, height_limit)),
    }
}

/// Average path length of an unsuccessful BST search over `n` points, c(n).
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile of an ascending slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
