//! Bulk historical datasets used to train the models.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use smartstock_core::{Equipment, Location, MetricReading, Movement, MovementKind};

use crate::metrics::generate_usage_metrics;
use crate::population::pick;

/// Bounds (inclusive) on the number of generated historical movements.
pub const MOVEMENT_COUNT_RANGE: core::ops::RangeInclusive<usize> = 100..=300;

/// Replay usage-metric generation at fixed steps over the last `days` days.
///
/// There are `floor(days * 24 / interval_hours)` steps; each one yields a
/// reading for every in-use equipment. Output is ordered by step, then by
/// population order. A window reaching before the earliest representable
/// timestamp yields nothing.
pub fn generate_historical_metrics<R: Rng + ?Sized>(
    rng: &mut R,
    equipment: &[Equipment],
    reference_time: DateTime<Utc>,
    days: u32,
    interval_hours: u32,
) -> Vec<MetricReading> {
    if interval_hours == 0 {
        return Vec::new();
    }

    let Some(start) = Duration::try_days(i64::from(days))
        .and_then(|window| reference_time.checked_sub_signed(window))
    else {
        tracing::warn!(days, "history window out of range, no metrics generated");
        return Vec::new();
    };

    let steps = u64::from(days) * 24 / u64::from(interval_hours);
    let in_use: Vec<&Equipment> = equipment.iter().filter(|e| e.in_use).collect();

    let capacity = usize::try_from(steps).unwrap_or(usize::MAX).saturating_mul(in_use.len());
    let mut readings = Vec::with_capacity(capacity.min(1 << 20));
    for step in 0..steps {
        // step * interval_hours <= days * 24, so the offset stays inside the window.
        let offset = (step * u64::from(interval_hours)) as i64;
        let timestamp = start + Duration::hours(offset);
        for e in &in_use {
            readings.push(generate_usage_metrics(rng, e, timestamp));
        }
    }

    tracing::debug!(days, interval_hours, count = readings.len(), "generated historical metrics");
    readings
}

/// Random stock movements over the last `days` days, sorted by timestamp.
///
/// Each movement is a fair coin between outbound (into an in-use location) and
/// inbound (back into storage), for a uniformly chosen equipment.
pub fn generate_historical_movements<R: Rng + ?Sized>(
    rng: &mut R,
    equipment: &[Equipment],
    reference_time: DateTime<Utc>,
    days: u32,
) -> Vec<Movement> {
    if equipment.is_empty() {
        return Vec::new();
    }

    let count = rng.random_range(MOVEMENT_COUNT_RANGE);
    let start = reference_time - Duration::days(i64::from(days));
    let window_ms = f64::from(days) * 86_400_000.0;

    let mut movements: Vec<Movement> = (0..count)
        .map(|_| {
            let offset_ms = (rng.random::<f64>() * window_ms) as i64;
            let e = &equipment[rng.random_range(0..equipment.len())];

            let (kind, destination) = if rng.random_bool(0.5) {
                (MovementKind::Outbound, pick(rng, Location::IN_USE))
            } else {
                (MovementKind::Inbound, pick(rng, Location::STORAGE))
            };

            Movement {
                equipment_id: e.id,
                category: e.category,
                timestamp: start + Duration::milliseconds(offset_ms),
                kind,
                quantity: 1,
                origin: None,
                destination,
            }
        })
        .collect();

    movements.sort_by_key(|m| m.timestamp);

    tracing::debug!(days, count = movements.len(), "generated historical movements");
    movements
}
