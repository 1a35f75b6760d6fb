use serde::{Deserialize, Serialize};

use smartstock_core::Category;

use crate::error::InventoryError;

pub const DEFAULT_SAFETY_DAYS: u32 = 7;
const DAYS_PER_YEAR: f64 = 365.0;

/// Level at which a replenishment order should be placed:
/// `floor(d × lead_time + d × safety_days)`. Negative demand counts as zero.
pub fn reorder_point(daily_demand: f64, lead_time_days: u32, safety_days: u32) -> u64 {
    let d = daily_demand.max(0.0);
    let rp = d * f64::from(lead_time_days) + d * f64::from(safety_days);
    if rp.is_finite() { rp.floor() as u64 } else { 0 }
}

/// Economic order quantity `floor(sqrt(2 × D × S / H))`.
///
/// `annual_demand` and `order_cost` must be finite and non-negative;
/// `holding_cost` must be finite and positive.
pub fn economic_order_quantity(
    annual_demand: f64,
    order_cost: f64,
    holding_cost: f64,
) -> Result<u64, InventoryError> {
    if !(holding_cost.is_finite() && holding_cost > 0.0) {
        return Err(InventoryError::invalid_input(format!(
            "holding cost must be positive, got {holding_cost}"
        )));
    }
    for (name, v) in [("annual demand", annual_demand), ("order cost", order_cost)] {
        if !(v.is_finite() && v >= 0.0) {
            return Err(InventoryError::invalid_input(format!(
                "{name} must be non-negative, got {v}"
            )));
        }
    }
    Ok((2.0 * annual_demand * order_cost / holding_cost).sqrt().floor() as u64)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// At or below the reorder point.
    Critical,
    /// Within 1.5× the reorder point.
    Attention,
    Ok,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "CRITICAL - Buy now",
            StockStatus::Attention => "ATTENTION - Plan purchase",
            StockStatus::Ok => "OK",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub status: StockStatus,
    /// Days of cover at the current demand, one decimal. Infinite (JSON
    /// `null`) when there is no demand.
    pub days_remaining: f64,
    pub recommended_action: String,
}

/// Classify `level` against `reorder_point`: `<= rp` Critical,
/// `<= 1.5 × rp` Attention, else Ok.
pub fn analyze_stock(level: u64, reorder_point: u64, daily_demand: f64) -> StockAnalysis {
    let days = if daily_demand > 0.0 {
        (level as f64 / daily_demand * 10.0).round() / 10.0
    } else {
        f64::INFINITY
    };

    let (status, recommended_action) = if level <= reorder_point {
        (
            StockStatus::Critical,
            format!("Place an order immediately. Stock covers only {days:.1} days."),
        )
    } else if level as f64 <= reorder_point as f64 * 1.5 {
        (
            StockStatus::Attention,
            format!("Plan an order soon. Stock covers {days:.1} days."),
        )
    } else {
        (
            StockStatus::Ok,
            format!("Stock is adequate for {days:.1} days."),
        )
    };

    StockAnalysis {
        status,
        days_remaining: days,
        recommended_action,
    }
}

/// Replenishment parameters shared by every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPolicy {
    pub lead_time_days: u32,
    pub safety_days: u32,
    /// Fixed cost per purchase order.
    pub order_cost: f64,
    /// Cost of holding one unit for a year.
    pub holding_cost: f64,
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self {
            lead_time_days: 5,
            safety_days: DEFAULT_SAFETY_DAYS,
            order_cost: 50.0,
            holding_cost: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecommendation {
    pub category: Category,
    pub stock_level: u64,
    pub daily_demand: f64,
    pub reorder_point: u64,
    pub economic_order_quantity: u64,
    pub analysis: StockAnalysis,
}

impl StockPolicy {
    pub fn reorder_point(&self, daily_demand: f64) -> u64 {
        reorder_point(daily_demand, self.lead_time_days, self.safety_days)
    }

    /// EOQ for a daily demand, annualized over 365 days.
    pub fn economic_order_quantity(&self, daily_demand: f64) -> Result<u64, InventoryError> {
        economic_order_quantity(
            daily_demand.max(0.0) * DAYS_PER_YEAR,
            self.order_cost,
            self.holding_cost,
        )
    }

    pub fn recommend(
        &self,
        category: Category,
        stock_level: u64,
        daily_demand: f64,
    ) -> Result<StockRecommendation, InventoryError> {
        let rp = self.reorder_point(daily_demand);
        Ok(StockRecommendation {
            category,
            stock_level,
            daily_demand,
            reorder_point: rp,
            economic_order_quantity: self.economic_order_quantity(daily_demand)?,
            analysis: analyze_stock(stock_level, rp, daily_demand),
        })
    }
}
