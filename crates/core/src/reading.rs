//! Sensor readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::equipment::{EquipmentState, Location};
use crate::id::EquipmentId;

/// Names of the model features, in the order produced by [`UsageFeatures::to_vec`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temperature_c",
    "cpu_percent",
    "ram_percent",
    "disk_percent",
    "failure_count",
];

pub const FEATURE_COUNT: usize = 5;

/// One usage sample reported by an equipment sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub equipment_id: EquipmentId,
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
    pub battery_health_percent: Option<f64>,
    pub failure_count: u32,
    pub state: EquipmentState,
}

impl MetricReading {
    pub fn features(&self) -> UsageFeatures {
        UsageFeatures {
            temperature_c: self.temperature_c,
            cpu_percent: self.cpu_percent,
            ram_percent: self.ram_percent,
            disk_percent: self.disk_percent,
            failure_count: f64::from(self.failure_count),
        }
    }
}

/// The feature vector every model consumes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageFeatures {
    pub temperature_c: f64,
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
    pub failure_count: f64,
}

impl UsageFeatures {
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.temperature_c,
            self.cpu_percent,
            self.ram_percent,
            self.disk_percent,
            self.failure_count,
        ]
    }

    /// A row is usable for training only if every feature is present (finite).
    pub fn is_complete(&self) -> bool {
        self.to_vec().iter().all(|v| v.is_finite())
    }
}

impl From<&MetricReading> for UsageFeatures {
    fn from(reading: &MetricReading) -> Self {
        reading.features()
    }
}

/// Storage-room climate sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientReading {
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> MetricReading {
        MetricReading {
            equipment_id: EquipmentId::new(1),
            timestamp: Utc::now(),
            temperature_c: 55.0,
            cpu_percent: 85.0,
            ram_percent: 90.0,
            disk_percent: 95.0,
            battery_health_percent: None,
            failure_count: 8,
            state: EquipmentState::Critical,
        }
    }

    #[test]
    fn features_follow_declared_order() {
        let v = reading().features().to_vec();
        assert_eq!(v, vec![55.0, 85.0, 90.0, 95.0, 8.0]);
        assert_eq!(v.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn nan_feature_makes_row_incomplete() {
        let mut f = reading().features();
        assert!(f.is_complete());
        f.cpu_percent = f64::NAN;
        assert!(!f.is_complete());
    }
}
