//! Dashboard configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use smartstock_ai::MaintenanceConfig;
use smartstock_inventory::StockPolicy;
use smartstock_simulator::SimulatorConfig;
use smartstock_simulator::config::env_or;

pub const DEFAULT_BIND: &str = "0.0.0.0:8050";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub bind: SocketAddr,
    /// Snapshot recomputation period (never below one second).
    pub refresh_interval: Duration,
    pub simulator: SimulatorConfig,
    /// Horizon of the dashboard demand forecasts.
    pub forecast_days: u32,
    pub policy: StockPolicy,
    pub maintenance: MaintenanceConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8050)),
            refresh_interval: Duration::from_secs(10),
            simulator: SimulatorConfig::default(),
            forecast_days: 30,
            policy: StockPolicy::default(),
            maintenance: MaintenanceConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let refresh_secs: u64 = env_or("SMARTSTOCK_REFRESH_SECS", d.refresh_interval.as_secs());
        let bind = std::env::var("SMARTSTOCK_BIND")
            .ok()
            .and_then(|raw| match raw.trim().parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!(value = %raw, default = DEFAULT_BIND, "invalid SMARTSTOCK_BIND; using default");
                    None
                }
            })
            .unwrap_or(d.bind);

        Self {
            bind,
            refresh_interval: Duration::from_secs(refresh_secs.max(1)),
            simulator: SimulatorConfig::from_env(),
            forecast_days: env_or("SMARTSTOCK_FORECAST_DAYS", d.forecast_days),
            policy: StockPolicy {
                lead_time_days: env_or("SMARTSTOCK_LEAD_TIME_DAYS", d.policy.lead_time_days),
                order_cost: env_or("SMARTSTOCK_ORDER_COST", d.policy.order_cost),
                holding_cost: env_or("SMARTSTOCK_HOLDING_COST", d.policy.holding_cost),
                ..d.policy
            },
            maintenance: d.maintenance,
        }
    }
}
