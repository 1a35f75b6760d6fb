//! Environment-driven configuration.

use core::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::simulator::IotSimulator;

/// Read `key` from the environment, falling back to `default` when unset or
/// unparsable (the latter is logged).
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "invalid value; using default");
            default
        }),
        Err(_) => default,
    }
}

/// Read an optional value; unset and unparsable both yield `None`.
pub fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "invalid value; ignoring");
            None
        }
    }
}

/// Population and dataset sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub equipment_count: usize,
    pub history_days: u32,
    pub sample_interval_hours: u32,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            equipment_count: 50,
            history_days: 90,
            sample_interval_hours: 6,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            equipment_count: env_or("SMARTSTOCK_EQUIPMENT", d.equipment_count),
            history_days: env_or("SMARTSTOCK_HISTORY_DAYS", d.history_days),
            sample_interval_hours: env_or("SMARTSTOCK_SAMPLE_HOURS", d.sample_interval_hours),
            seed: env_opt("SMARTSTOCK_SEED"),
        }
    }

    pub fn build(&self) -> IotSimulator<StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        IotSimulator::from_rng(rng, self.equipment_count)
    }
}
