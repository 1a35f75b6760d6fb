use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use smartstock_core::{
    AmbientReading, Category, Equipment, EquipmentId, Location, MetricReading, Movement, MovementKind,
};

use crate::history;
use crate::metrics;
use crate::population;

/// Equipment sampled per realtime tick.
pub const REALTIME_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("unknown equipment: {0}")]
    UnknownEquipment(EquipmentId),
}

/// Stateful IoT sensor simulator over a fixed equipment population.
///
/// The population is generated once at construction; afterwards only
/// equipment locations change (through [`IotSimulator::simulate_movement`]).
/// Historical datasets are stamped relative to `reference_time`; live
/// readings use the wall clock.
#[derive(Debug, Clone)]
pub struct IotSimulator<R: Rng = StdRng> {
    rng: R,
    reference_time: DateTime<Utc>,
    equipment: Vec<Equipment>,
}

impl IotSimulator<StdRng> {
    /// Simulator seeded from the OS entropy source.
    pub fn new(equipment_count: usize) -> Self {
        Self::from_rng(StdRng::from_os_rng(), equipment_count)
    }

    /// Deterministic simulator (same seed, same population and readings).
    pub fn with_seed(seed: u64, equipment_count: usize) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), equipment_count)
    }
}

impl<R: Rng> IotSimulator<R> {
    pub fn from_rng(rng: R, equipment_count: usize) -> Self {
        Self::from_rng_at(rng, equipment_count, Utc::now())
    }

    pub fn from_rng_at(mut rng: R, equipment_count: usize, reference_time: DateTime<Utc>) -> Self {
        let equipment = population::generate_equipment(&mut rng, equipment_count, reference_time);
        info!(count = equipment.len(), "equipment population generated");
        Self {
            rng,
            reference_time,
            equipment,
        }
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn get(&self, id: EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    /// One fresh usage reading for the given equipment, stamped now.
    pub fn generate_usage_metrics(&mut self, id: EquipmentId) -> Result<MetricReading, SimulatorError> {
        let Self { rng, equipment, .. } = self;
        let e = equipment
            .iter()
            .find(|e| e.id == id)
            .ok_or(SimulatorError::UnknownEquipment(id))?;
        Ok(metrics::generate_usage_metrics(rng, e, Utc::now()))
    }

    pub fn ambient_reading(&mut self, location: Location) -> AmbientReading {
        metrics::generate_ambient_reading(&mut self.rng, location, Utc::now())
    }

    /// Move equipment to `destination`, returning the recorded movement.
    pub fn simulate_movement(
        &mut self,
        id: EquipmentId,
        destination: Location,
    ) -> Result<Movement, SimulatorError> {
        let e = self
            .equipment
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(SimulatorError::UnknownEquipment(id))?;

        let origin = e.location;
        e.location = destination;

        Ok(Movement {
            equipment_id: id,
            category: e.category,
            timestamp: Utc::now(),
            kind: MovementKind::for_destination(destination),
            quantity: 1,
            origin: Some(origin),
            destination,
        })
    }

    pub fn generate_historical_metrics(&mut self, days: u32, interval_hours: u32) -> Vec<MetricReading> {
        info!(days, interval_hours, "generating historical metrics");
        let readings = history::generate_historical_metrics(
            &mut self.rng,
            &self.equipment,
            self.reference_time,
            days,
            interval_hours,
        );
        info!(count = readings.len(), "historical metrics generated");
        readings
    }

    pub fn generate_historical_movements(&mut self, days: u32) -> Vec<Movement> {
        info!(days, "generating historical movements");
        let movements = history::generate_historical_movements(
            &mut self.rng,
            &self.equipment,
            self.reference_time,
            days,
        );
        info!(count = movements.len(), "historical movements generated");
        movements
    }

    /// Units currently in storage, per category (categories with no units are absent).
    pub fn stock_levels(&self) -> BTreeMap<Category, usize> {
        let mut levels = BTreeMap::new();
        for e in self.equipment.iter().filter(|e| e.location.is_storage()) {
            *levels.entry(e.category).or_insert(0) += 1;
        }
        levels
    }

    /// Equipment currently at an in-use location.
    pub fn equipment_in_use(&self) -> Vec<&Equipment> {
        self.equipment.iter().filter(|e| e.location.is_in_use()).collect()
    }

    /// Blocking collection loop.
    ///
    /// Every `interval`, samples up to five in-use equipment, logs one line
    /// per reading and keeps the readings; stops once `duration` has elapsed.
    pub fn run_realtime(&mut self, duration: Duration, interval: Duration) -> Vec<MetricReading> {
        info!(?duration, ?interval, "realtime simulation started");

        let started = Instant::now();
        let mut collected = Vec::new();

        while started.elapsed() < duration {
            let Self { rng, equipment, .. } = self;
            let active: Vec<&Equipment> = equipment.iter().filter(|e| e.in_use).collect();
            let sample: Vec<&Equipment> = active
                .choose_multiple(rng, REALTIME_SAMPLE_SIZE)
                .copied()
                .collect();

            for e in sample {
                let reading = metrics::generate_usage_metrics(rng, e, Utc::now());
                info!(
                    equipment = %reading.equipment_id,
                    temperature_c = reading.temperature_c,
                    cpu_percent = reading.cpu_percent,
                    "reading published"
                );
                collected.push(reading);
            }

            thread::sleep(interval);
        }

        info!(count = collected.len(), "realtime simulation finished");
        collected
    }
}
