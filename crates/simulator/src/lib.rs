//! `smartstock-simulator`
//!
//! **Responsibility:** synthetic IoT data for the rest of the system.
//!
//! Everything here is a bounded random draw: equipment populations, usage
//! readings keyed off equipment state, storage-room climate, and stock
//! movements. Randomness is always injected, so tests seed it.

pub mod config;
pub mod history;
pub mod metrics;
pub mod population;
pub mod simulator;

pub use config::SimulatorConfig;
pub use history::{generate_historical_metrics, generate_historical_movements};
pub use metrics::{generate_ambient_reading, generate_usage_metrics};
pub use population::generate_equipment;
pub use simulator::{IotSimulator, SimulatorError};
