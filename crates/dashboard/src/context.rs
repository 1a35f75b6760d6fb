use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use smartstock_ai::{
    AnomalyDetector, AnomalyReport, ClusterReport, DemandForecaster, MaintenanceReport,
    PredictiveMaintenance, StateClassifier, TrainableModel,
};
use smartstock_core::{MetricReading, Movement};
use smartstock_simulator::IotSimulator;

use crate::config::DashboardConfig;
use crate::snapshot::{DashboardSnapshot, build_snapshot};

/// The trained models. Read-only once the context is built.
#[derive(Debug)]
pub struct Models {
    pub maintenance: PredictiveMaintenance,
    pub anomaly: AnomalyDetector,
    pub classifier: StateClassifier,
    pub demand: DemandForecaster,
}

/// What each model reported when it was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub metric_rows: usize,
    pub movements: usize,
    pub maintenance: MaintenanceReport,
    pub anomaly: AnomalyReport,
    pub clusters: ClusterReport,
    /// (day, category) rows cached by the demand forecaster.
    pub demand_rows: usize,
}

/// Shared application state handed to every handler and the refresher.
#[derive(Debug)]
pub struct AppContext {
    config: DashboardConfig,
    simulator: Mutex<IotSimulator>,
    models: Models,
    training: TrainingSummary,
    latest: Mutex<DashboardSnapshot>,
}

impl AppContext {
    /// Generate history from the configured simulator, train every model and
    /// compute the first snapshot.
    pub fn bootstrap(config: DashboardConfig) -> anyhow::Result<Self> {
        let mut simulator = config.simulator.build();
        let metrics = simulator.generate_historical_metrics(
            config.simulator.history_days,
            config.simulator.sample_interval_hours,
        );
        let movements = simulator.generate_historical_movements(config.simulator.history_days);
        Self::from_parts(config, simulator, &metrics, &movements)
    }

    /// Train on caller-supplied history (used by tests to pin the datasets).
    pub fn from_parts(
        config: DashboardConfig,
        mut simulator: IotSimulator,
        metrics: &[MetricReading],
        movements: &[Movement],
    ) -> anyhow::Result<Self> {
        config
            .policy
            .economic_order_quantity(1.0)
            .context("invalid stock policy")?;

        let mut maintenance = PredictiveMaintenance::new(config.maintenance.clone());
        let maintenance_report = maintenance
            .train(metrics)
            .context("training predictive maintenance")?;

        let mut anomaly = AnomalyDetector::default();
        let anomaly_report = anomaly.train(metrics).context("training anomaly detector")?;

        let mut classifier = StateClassifier::default();
        let clusters = classifier.train(metrics).context("training state classifier")?;

        let mut demand = DemandForecaster::new();
        let demand_rows = demand.train(movements).context("training demand forecaster")?;

        let models = Models {
            maintenance,
            anomaly,
            classifier,
            demand,
        };
        let training = TrainingSummary {
            metric_rows: metrics.len(),
            movements: movements.len(),
            maintenance: maintenance_report,
            anomaly: anomaly_report,
            clusters,
            demand_rows,
        };

        let first = build_snapshot(&mut simulator, &models, &config.policy, config.forecast_days);
        info!(
            equipment = first.counts.total,
            metric_rows = training.metric_rows,
            movements = training.movements,
            "dashboard context ready"
        );

        Ok(Self {
            config,
            simulator: Mutex::new(simulator),
            models,
            training,
            latest: Mutex::new(first),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn training(&self) -> &TrainingSummary {
        &self.training
    }

    /// Exclusive access to the simulator (readings advance its RNG).
    pub fn simulator(&self) -> MutexGuard<'_, IotSimulator> {
        self.simulator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn latest(&self) -> DashboardSnapshot {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recompute the snapshot and make it the latest one.
    pub fn refresh(&self) -> DashboardSnapshot {
        let snapshot = {
            let mut simulator = self.simulator();
            build_snapshot(
                &mut *simulator,
                &self.models,
                &self.config.policy,
                self.config.forecast_days,
            )
        };
        info!(
            at_risk = snapshot.at_risk.len(),
            alerts = snapshot.alerts.len(),
            "dashboard refreshed"
        );
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        snapshot
    }
}
