use std::time::Duration;

use smartstock_simulator::SimulatorConfig;
use smartstock_simulator::config::env_or;

fn main() -> anyhow::Result<()> {
    smartstock_observability::init();

    let cfg = SimulatorConfig::from_env();
    let realtime_secs: u64 = env_or("SMARTSTOCK_REALTIME_SECS", 60);
    let interval_secs: u64 = env_or("SMARTSTOCK_REALTIME_INTERVAL_SECS", 5);

    let mut simulator = cfg.build();

    for e in simulator.equipment().iter().take(10) {
        tracing::info!(
            id = %e.id,
            category = %e.category,
            state = %e.state,
            location = %e.location,
            age_months = e.age_months,
            "equipment"
        );
    }

    if let Some(first) = simulator.equipment().first().map(|e| e.id) {
        let reading = simulator.generate_usage_metrics(first)?;
        tracing::info!(reading = %serde_json::to_string(&reading)?, "sample reading");
    }

    for (category, units) in simulator.stock_levels() {
        tracing::info!(%category, units, "stock level");
    }

    let history = simulator.generate_historical_metrics(cfg.history_days, cfg.sample_interval_hours);
    tracing::info!(rows = history.len(), "historical sample ready");

    simulator.run_realtime(
        Duration::from_secs(realtime_secs),
        Duration::from_secs(interval_secs),
    );

    Ok(())
}
