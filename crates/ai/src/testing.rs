//! Deterministic training fixtures.

use chrono::{NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use smartstock_core::{
    Category, Equipment, EquipmentId, EquipmentState, Location, Manufacturer, MetricReading,
};
use smartstock_simulator::generate_usage_metrics;

/// Ages spanning all four tiers: Novo, Bom, Atenção, Crítico.
const TIER_AGES: [u32; 4] = [2, 12, 30, 55];

pub(crate) fn equipment(seq: u32, age_months: u32) -> Equipment {
    Equipment {
        id: EquipmentId::new(seq),
        rfid: format!("RFID{:05}", 10_000 + seq),
        category: Category::Desktop,
        manufacturer: Manufacturer::Dell,
        model: "Model-1000".to_string(),
        location: Location::InUseIt,
        state: EquipmentState::from_age(age_months),
        age_months,
        acquired_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        acquisition_value: 5_000,
        in_use: true,
    }
}

/// `per_state` readings for each of the four tiers, interleaved by tier.
pub(crate) fn training_metrics(seed: u64, per_state: usize) -> Vec<MetricReading> {
    let mut rng = StdRng::seed_from_u64(seed);
    let fleet: Vec<Equipment> = TIER_AGES
        .iter()
        .enumerate()
        .map(|(i, &age)| equipment(i as u32 + 1, age))
        .collect();

    let now = Utc::now();
    let mut out = Vec::with_capacity(per_state * fleet.len());
    for _ in 0..per_state {
        for e in &fleet {
            out.push(generate_usage_metrics(&mut rng, e, now));
        }
    }
    out
}
