//! `smartstock-core`: domain vocabulary shared by every SmartStock crate.
//!
//! This crate contains **pure data** (no randomness, no IO): equipment records,
//! sensor readings, stock movements and the labels attached to them.

pub mod equipment;
pub mod error;
pub mod id;
pub mod movement;
pub mod reading;

pub use equipment::{Category, Equipment, EquipmentState, Location, Manufacturer};
pub use error::{DomainError, DomainResult};
pub use id::EquipmentId;
pub use movement::{Movement, MovementKind};
pub use reading::{AmbientReading, MetricReading, UsageFeatures, FEATURE_COUNT, FEATURE_NAMES};
