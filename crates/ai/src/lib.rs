//! `smartstock-ai`
//!
//! **Responsibility:** the statistical/ML models behind the dashboard.
//!
//! Every stateful model follows the same contract ([`TrainableModel`]):
//! it starts untrained, `train` fits it on a historical dataset, and
//! `predict` fails with [`AiError::NotReady`] until that has happened.
//! Models never mutate the data they are given.

pub mod anomaly;
pub mod classifier;
mod dataset;
pub mod demand;
pub mod isolation_forest;
pub mod maintenance;
pub mod model;
pub mod result;
pub mod scaler;

pub use anomaly::{AnomalyDetector, AnomalyPrediction, AnomalyReport};
pub use classifier::{ClusterCentroid, ClusterReport, StateClassification, StateClassifier};
pub use demand::{DailyDemand, DemandForecast, DemandForecaster, DemandQuery, MovingAveragePoint};
pub use isolation_forest::{IsolationForest, IsolationForestParams};
pub use maintenance::{MaintenanceConfig, MaintenancePrediction, MaintenanceReport, PredictiveMaintenance};
pub use model::TrainableModel;
pub use result::{AiError, ClassMetrics, Severity};
pub use scaler::FeatureScaler;

#[cfg(test)]
pub(crate) mod testing;
