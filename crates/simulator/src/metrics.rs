use core::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::Rng;

use smartstock_core::{AmbientReading, Equipment, EquipmentState, Location, MetricReading};

/// Baseline equipment temperature; every tier adds a positive offset.
pub const BASE_TEMPERATURE_C: f64 = 35.0;

/// Sampling ranges for one state tier.
///
/// New and Good equipment share the healthy tier; worse tiers are shifted
/// higher on every axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TierRanges {
    pub temperature_c: RangeInclusive<f64>,
    pub cpu_percent: RangeInclusive<f64>,
    pub ram_percent: RangeInclusive<f64>,
    pub failure_count: RangeInclusive<u32>,
}

impl TierRanges {
    pub fn for_state(state: EquipmentState) -> Self {
        match state {
            EquipmentState::Critical => Self {
                temperature_c: BASE_TEMPERATURE_C + 15.0..=BASE_TEMPERATURE_C + 25.0,
                cpu_percent: 70.0..=100.0,
                ram_percent: 80.0..=100.0,
                failure_count: 5..=15,
            },
            EquipmentState::Attention => Self {
                temperature_c: BASE_TEMPERATURE_C + 5.0..=BASE_TEMPERATURE_C + 15.0,
                cpu_percent: 40.0..=70.0,
                ram_percent: 50.0..=80.0,
                failure_count: 1..=5,
            },
            EquipmentState::New | EquipmentState::Good => Self {
                temperature_c: BASE_TEMPERATURE_C..=BASE_TEMPERATURE_C + 5.0,
                cpu_percent: 10.0..=40.0,
                ram_percent: 20.0..=50.0,
                failure_count: 0..=1,
            },
        }
    }
}

/// Disk usage grows 1.5 points per month of age plus up to 20 points of noise.
pub fn disk_usage<R: Rng + ?Sized>(rng: &mut R, age_months: u32) -> f64 {
    (f64::from(age_months) * 1.5 + rng.random_range(0.0..=20.0)).min(100.0)
}

/// Battery health loses 1.5 points per month of age, ±10 points of noise.
pub fn battery_health<R: Rng + ?Sized>(rng: &mut R, age_months: u32) -> f64 {
    (100.0 - f64::from(age_months) * 1.5 + rng.random_range(-10.0..=10.0)).clamp(0.0, 100.0)
}

/// Generate one usage reading for `equipment`, stamped with `timestamp`.
pub fn generate_usage_metrics<R: Rng + ?Sized>(
    rng: &mut R,
    equipment: &Equipment,
    timestamp: DateTime<Utc>,
) -> MetricReading {
    let tier = TierRanges::for_state(equipment.state);

    let temperature_c = rng.random_range(tier.temperature_c);
    let cpu_percent = rng.random_range(tier.cpu_percent);
    let ram_percent = rng.random_range(tier.ram_percent);
    let disk_percent = disk_usage(rng, equipment.age_months);
    let battery_health_percent = equipment
        .category
        .has_battery()
        .then(|| round2(battery_health(rng, equipment.age_months)));
    let failure_count = rng.random_range(tier.failure_count);

    MetricReading {
        equipment_id: equipment.id,
        timestamp,
        temperature_c: round2(temperature_c),
        cpu_percent: round2(cpu_percent),
        ram_percent: round2(ram_percent),
        disk_percent: round2(disk_percent),
        battery_health_percent,
        failure_count,
        state: equipment.state,
    }
}

/// Storage-room climate: 18-26 °C, 35-65 % relative humidity.
pub fn generate_ambient_reading<R: Rng + ?Sized>(
    rng: &mut R,
    location: Location,
    timestamp: DateTime<Utc>,
) -> AmbientReading {
    AmbientReading {
        location,
        timestamp,
        temperature_c: round2(rng.random_range(18.0..=26.0)),
        humidity_percent: round2(rng.random_range(35.0..=65.0)),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
