//! Naive demand forecasting from outbound movements.
//!
//! Model:
//! - Keep outbound movements and sum quantities per (day, category).
//! - Forecast over `h` days = floor(mean daily demand × h).
//! - 95% margin = floor(1.96 × sample std × sqrt(h)); the lower bound saturates at 0.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use smartstock_core::{Category, Movement};

use crate::model::TrainableModel;
use crate::result::AiError;

const Z_95: f64 = 1.96;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDemand {
    pub date: NaiveDate,
    pub category: Category,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub category: Category,
    pub horizon_days: u32,
    pub predicted_demand: u64,
    /// (lower, upper) units over the horizon.
    pub confidence_interval: (u64, u64),
    pub daily_mean: f64,
    pub daily_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub quantity: u64,
    /// Mean of the trailing window ending at `date`; `None` until a full
    /// window of days exists.
    pub moving_average: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandQuery {
    pub category: Category,
    pub horizon_days: u32,
}

/// Outbound quantity per (day, category), ordered by date then category.
pub fn daily_demand(movements: &[Movement]) -> Vec<DailyDemand> {
    let mut table: BTreeMap<(NaiveDate, Category), u64> = BTreeMap::new();
    for m in movements.iter().filter(|m| m.is_outbound()) {
        *table
            .entry((m.timestamp.date_naive(), m.category))
            .or_default() += u64::from(m.quantity);
    }
    table
        .into_iter()
        .map(|((date, category), quantity)| DailyDemand {
            date,
            category,
            quantity,
        })
        .collect()
}

/// Forecast `category` demand over `horizon_days`; `None` when the category
/// has no outbound history.
pub fn forecast_demand(
    movements: &[Movement],
    category: Category,
    horizon_days: u32,
) -> Option<DemandForecast> {
    forecast_from_daily(&daily_demand(movements), category, horizon_days)
}

fn forecast_from_daily(
    daily: &[DailyDemand],
    category: Category,
    horizon_days: u32,
) -> Option<DemandForecast> {
    let counts: Vec<f64> = daily
        .iter()
        .filter(|d| d.category == category)
        .map(|d| d.quantity as f64)
        .collect();
    if counts.is_empty() {
        return None;
    }

    let mean = counts.iter().sum::<f64>() / counts.len() as f64;
    let std = sample_std(&counts, mean);
    let h = f64::from(horizon_days);

    let predicted = (mean * h).floor() as u64;
    let margin = (Z_95 * std * h.sqrt()).floor() as u64;

    Some(DemandForecast {
        category,
        horizon_days,
        predicted_demand: predicted,
        confidence_interval: (predicted.saturating_sub(margin), predicted + margin),
        daily_mean: mean,
        daily_std: std,
    })
}

/// Trailing moving average of `category` daily demand. `window` of 0 is
/// treated as 1.
pub fn moving_average(
    daily: &[DailyDemand],
    category: Category,
    window: usize,
) -> Vec<MovingAveragePoint> {
    let window = window.max(1);
    let series: Vec<&DailyDemand> = daily.iter().filter(|d| d.category == category).collect();
    series
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let moving_average = (i + 1 >= window).then(|| {
                let sum: u64 = series[i + 1 - window..=i].iter().map(|p| p.quantity).sum();
                sum as f64 / window as f64
            });
            MovingAveragePoint {
                date: d.date,
                quantity: d.quantity,
                moving_average,
            }
        })
        .collect()
}

/// Sample standard deviation (n-1); a single observation has no spread.
fn sample_std(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Stateful wrapper caching the daily demand table between forecasts.
#[derive(Debug, Clone, Default)]
pub struct DemandForecaster {
    daily: Option<Vec<DailyDemand>>,
}

impl DemandForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories with outbound history, in order of first appearance.
    pub fn categories(&self) -> Result<Vec<Category>, AiError> {
        let daily = self.daily.as_ref().ok_or(AiError::NotReady(self.name()))?;
        let mut seen = Vec::new();
        for d in daily {
            if !seen.contains(&d.category) {
                seen.push(d.category);
            }
        }
        Ok(seen)
    }

    pub fn moving_average(
        &self,
        category: Category,
        window: usize,
    ) -> Result<Vec<MovingAveragePoint>, AiError> {
        let daily = self.daily.as_ref().ok_or(AiError::NotReady(self.name()))?;
        Ok(moving_average(daily, category, window))
    }
}

impl TrainableModel for DemandForecaster {
    type Dataset = [Movement];
    type Input = DemandQuery;
    type Output = Option<DemandForecast>;
    /// Number of (day, category) rows in the cached table.
    type Report = usize;

    fn name(&self) -> &'static str {
        "demand_forecaster"
    }

    fn is_trained(&self) -> bool {
        self.daily.is_some()
    }

    fn train(&mut self, data: &[Movement]) -> Result<usize, AiError> {
        let daily = daily_demand(data);
        info!(
            model = self.name(),
            movements = data.len(),
            days = daily.len(),
            "model trained"
        );
        let rows = daily.len();
        self.daily = Some(daily);
        Ok(rows)
    }

    fn predict(&self, query: &DemandQuery) -> Result<Option<DemandForecast>, AiError> {
        let daily = self.daily.as_ref().ok_or(AiError::NotReady(self.name()))?;
        Ok(forecast_from_daily(daily, query.category, query.horizon_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::{prop_assert, proptest};
    use smartstock_core::{EquipmentId, Location, MovementKind};

    fn movement(day: i64, category: Category, kind: MovementKind) -> Movement {
        let destination = match kind {
            MovementKind::Outbound => Location::InUseIt,
            MovementKind::Inbound => Location::WarehouseA,
        };
        Movement {
            equipment_id: EquipmentId::new(1),
            category,
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(day),
            kind,
            quantity: 1,
            origin: None,
            destination,
        }
    }

    /// Notebook outbound counts: day0 = 2, day1 = 4, day2 = 6.
    fn history() -> Vec<Movement> {
        let mut out = Vec::new();
        for (day, n) in [(0, 2), (1, 4), (2, 6)] {
            for _ in 0..n {
                out.push(movement(day, Category::Notebook, MovementKind::Outbound));
            }
        }
        out.push(movement(1, Category::Notebook, MovementKind::Inbound));
        out.push(movement(1, Category::Monitor, MovementKind::Outbound));
        out
    }

    #[test]
    fn daily_table_counts_outbound_only() {
        let daily = daily_demand(&history());
        let notebook: Vec<u64> = daily
            .iter()
            .filter(|d| d.category == Category::Notebook)
            .map(|d| d.quantity)
            .collect();
        assert_eq!(notebook, vec![2, 4, 6]);
        assert_eq!(daily.len(), 4);
    }

    #[test]
    fn forecast_uses_mean_and_sample_std() {
        let f = forecast_demand(&history(), Category::Notebook, 30).unwrap();
        assert_eq!(f.daily_mean, 4.0);
        assert_eq!(f.daily_std, 2.0);
        assert_eq!(f.predicted_demand, 120);
        // margin = floor(1.96 * 2 * sqrt(30)) = 21
        assert_eq!(f.confidence_interval, (99, 141));
    }

    #[test]
    fn lower_bound_never_goes_negative() {
        let mut data = vec![movement(0, Category::Router, MovementKind::Outbound)];
        for _ in 0..20 {
            data.push(movement(1, Category::Router, MovementKind::Outbound));
        }
        let f = forecast_demand(&data, Category::Router, 1).unwrap();
        assert_eq!(f.confidence_interval.0, 0);
        assert!(f.confidence_interval.1 >= f.predicted_demand);
    }

    #[test]
    fn absent_category_has_no_forecast() {
        assert!(forecast_demand(&history(), Category::Server, 30).is_none());
        assert!(forecast_demand(&[], Category::Notebook, 30).is_none());
    }

    #[test]
    fn single_day_has_zero_spread() {
        let f = forecast_demand(&history(), Category::Monitor, 10).unwrap();
        assert_eq!(f.daily_std, 0.0);
        assert_eq!(f.confidence_interval, (10, 10));
    }

    #[test]
    fn moving_average_uses_trailing_window() {
        let daily = daily_demand(&history());
        let ma = moving_average(&daily, Category::Notebook, 2);
        let values: Vec<Option<f64>> = ma.iter().map(|p| p.moving_average).collect();
        assert_eq!(values, vec![None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn moving_average_is_empty_until_window_fills() {
        let daily = daily_demand(&history());
        let ma = moving_average(&daily, Category::Notebook, 7);
        assert_eq!(ma.len(), 3);
        assert!(ma.iter().all(|p| p.moving_average.is_none()));

        let json = serde_json::to_value(&ma[0]).unwrap();
        assert!(json["moving_average"].is_null());

        let ones = moving_average(&daily, Category::Notebook, 0);
        assert_eq!(ones[0].moving_average, Some(2.0));
    }

    #[test]
    fn forecaster_requires_training() {
        let model = DemandForecaster::new();
        let query = DemandQuery {
            category: Category::Notebook,
            horizon_days: 30,
        };
        assert_eq!(
            model.predict(&query).unwrap_err(),
            AiError::NotReady("demand_forecaster")
        );
        assert!(model.categories().is_err());
    }

    #[test]
    fn forecaster_matches_pure_function() {
        let data = history();
        let mut model = DemandForecaster::new();
        assert_eq!(model.train(&data).unwrap(), 4);
        let query = DemandQuery {
            category: Category::Notebook,
            horizon_days: 30,
        };
        assert_eq!(
            model.predict(&query).unwrap(),
            forecast_demand(&data, Category::Notebook, 30)
        );
        assert_eq!(
            model.categories().unwrap(),
            vec![Category::Notebook, Category::Monitor]
        );
    }

    proptest! {
        #[test]
        fn interval_brackets_the_forecast(
            counts in proptest::collection::vec(0usize..20, 1..15),
            horizon in 0u32..120,
        ) {
            let mut data = Vec::new();
            for (day, n) in counts.iter().enumerate() {
                for _ in 0..*n {
                    data.push(movement(day as i64, Category::Switch, MovementKind::Outbound));
                }
            }
            if let Some(f) = forecast_demand(&data, Category::Switch, horizon) {
                let (lo, hi) = f.confidence_interval;
                prop_assert!(lo <= f.predicted_demand);
                prop_assert!(f.predicted_demand <= hi);
                prop_assert!(f.daily_std >= 0.0);
            } else {
                prop_assert!(counts.iter().all(|n| *n == 0));
            }
        }
    }
}
