//! Inventory formulas: reorder point, economic order quantity and stock
//! status.
//!
//! Pure, deterministic functions (no IO, no model state).

pub mod error;
pub mod optimizer;

pub use error::InventoryError;
pub use optimizer::{
    StockAnalysis, StockPolicy, StockRecommendation, StockStatus, analyze_stock,
    economic_order_quantity, reorder_point,
};
