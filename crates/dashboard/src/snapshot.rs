//! The dashboard view model, recomputed on every refresh tick.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use smartstock_ai::{DemandForecast, DemandQuery, Severity, TrainableModel};
use smartstock_core::{Category, EquipmentId, EquipmentState, Location};
use smartstock_inventory::{StockPolicy, StockRecommendation};
use smartstock_simulator::IotSimulator;

use crate::context::Models;

/// In-use equipment inspected per refresh.
pub const AT_RISK_SCAN_LIMIT: usize = 10;
/// Categories forecast per refresh.
pub const FORECAST_CATEGORY_LIMIT: usize = 5;
/// Storage units below which a category raises a low-stock alert.
pub const LOW_STOCK_THRESHOLD: usize = 3;

const AT_RISK_PROBABILITY: f64 = 0.5;
const URGENT_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCounts {
    pub total: usize,
    pub critical: usize,
    pub in_use: usize,
    pub in_storage: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateCount {
    pub state: EquipmentState,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStock {
    pub category: Category,
    pub units: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskEquipment {
    pub id: EquipmentId,
    pub category: Category,
    pub location: Location,
    pub state: EquipmentState,
    pub age_months: u32,
    pub failure_probability: f64,
    pub risk: Severity,
    pub action: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Critical,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub counts: EquipmentCounts,
    pub state_distribution: Vec<StateCount>,
    pub stock_by_category: Vec<CategoryStock>,
    pub at_risk: Vec<AtRiskEquipment>,
    pub forecasts: Vec<DemandForecast>,
    pub recommendations: Vec<StockRecommendation>,
    pub alerts: Vec<Alert>,
}

/// Maintenance action for an at-risk probability.
pub fn maintenance_action(probability: f64) -> &'static str {
    if probability > URGENT_PROBABILITY {
        "Urgent maintenance"
    } else {
        "Schedule maintenance"
    }
}

/// Build a snapshot from the current population and trained models.
///
/// Takes `&mut` because at-risk scoring draws fresh readings.
pub fn build_snapshot<R: Rng>(
    simulator: &mut IotSimulator<R>,
    models: &Models,
    policy: &StockPolicy,
    forecast_days: u32,
) -> DashboardSnapshot {
    let equipment = simulator.equipment();
    let stock = simulator.stock_levels();
    let in_use: Vec<EquipmentId> = simulator.equipment_in_use().iter().map(|e| e.id).collect();

    let counts = EquipmentCounts {
        total: equipment.len(),
        critical: equipment
            .iter()
            .filter(|e| e.state == EquipmentState::Critical)
            .count(),
        in_use: in_use.len(),
        in_storage: stock.values().sum(),
    };

    let state_distribution = EquipmentState::ALL
        .iter()
        .map(|&state| StateCount {
            state,
            count: equipment.iter().filter(|e| e.state == state).count(),
        })
        .collect();

    let stock_by_category: Vec<CategoryStock> = Category::ALL
        .iter()
        .map(|&category| CategoryStock {
            category,
            units: stock.get(&category).copied().unwrap_or(0),
        })
        .collect();

    // Categories in order of first appearance in the population.
    let mut categories: Vec<Category> = Vec::new();
    for e in equipment {
        if !categories.contains(&e.category) {
            categories.push(e.category);
        }
    }

    let forecasts: Vec<DemandForecast> = categories
        .iter()
        .take(FORECAST_CATEGORY_LIMIT)
        .filter_map(|&category| forecast(models, category, forecast_days))
        .collect();

    let recommendations = stock_by_category
        .iter()
        .filter_map(|s| {
            let daily = forecast(models, s.category, 1).map_or(0.0, |f| f.daily_mean);
            policy
                .recommend(s.category, s.units as u64, daily)
                .map_err(|e| warn!(category = %s.category, error = %e, "stock recommendation skipped"))
                .ok()
        })
        .collect();

    let alerts = build_alerts(&stock_by_category, counts.critical, counts.in_use);

    let at_risk = in_use
        .iter()
        .take(AT_RISK_SCAN_LIMIT)
        .filter_map(|&id| score_equipment(simulator, models, id))
        .collect();

    DashboardSnapshot {
        generated_at: Utc::now(),
        counts,
        state_distribution,
        stock_by_category,
        at_risk,
        forecasts,
        recommendations,
        alerts,
    }
}

fn forecast(models: &Models, category: Category, horizon_days: u32) -> Option<DemandForecast> {
    let query = DemandQuery {
        category,
        horizon_days,
    };
    models
        .demand
        .predict(&query)
        .map_err(|e| warn!(%category, error = %e, "demand forecast failed"))
        .ok()
        .flatten()
}

fn score_equipment<R: Rng>(
    simulator: &mut IotSimulator<R>,
    models: &Models,
    id: EquipmentId,
) -> Option<AtRiskEquipment> {
    let reading = simulator
        .generate_usage_metrics(id)
        .map_err(|e| warn!(%id, error = %e, "reading failed"))
        .ok()?;
    let prediction = models
        .maintenance
        .predict(&reading.features())
        .map_err(|e| warn!(%id, error = %e, "maintenance prediction failed"))
        .ok()?;
    if prediction.failure_probability <= AT_RISK_PROBABILITY {
        return None;
    }

    let e = simulator.get(id)?;
    Some(AtRiskEquipment {
        id,
        category: e.category,
        location: e.location,
        state: e.state,
        age_months: e.age_months,
        failure_probability: prediction.failure_probability,
        risk: prediction.risk,
        action: maintenance_action(prediction.failure_probability).to_string(),
    })
}

fn build_alerts(stock: &[CategoryStock], critical: usize, in_use: usize) -> Vec<Alert> {
    let mut out: Vec<Alert> = stock
        .iter()
        .filter(|s| s.units < LOW_STOCK_THRESHOLD)
        .map(|s| Alert {
            level: AlertLevel::Critical,
            title: format!("Low stock: {}", s.category),
            message: format!("Only {} units available. Buy soon.", s.units),
        })
        .collect();

    if critical > 0 {
        out.push(Alert {
            level: AlertLevel::Critical,
            title: format!("{critical} critical equipment"),
            message: "Equipment needs replacement or immediate maintenance.".to_string(),
        });
    }

    out.push(Alert {
        level: AlertLevel::Info,
        title: "Anomaly monitoring active".to_string(),
        message: format!("Continuous monitoring of {in_use} in-use equipment."),
    });
    out
}
