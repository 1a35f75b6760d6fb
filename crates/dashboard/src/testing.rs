//! Small, seeded context for unit tests.

use std::time::Duration;

use smartstock_ai::MaintenanceConfig;
use smartstock_simulator::SimulatorConfig;

use crate::config::DashboardConfig;
use crate::context::AppContext;

pub(crate) fn config() -> DashboardConfig {
    DashboardConfig {
        refresh_interval: Duration::from_secs(1),
        simulator: SimulatorConfig {
            equipment_count: 20,
            history_days: 8,
            sample_interval_hours: 12,
            seed: Some(3),
        },
        maintenance: MaintenanceConfig {
            n_trees: 8,
            ..MaintenanceConfig::default()
        },
        ..DashboardConfig::default()
    }
}

pub(crate) fn context() -> AppContext {
    AppContext::bootstrap(config()).unwrap()
}
