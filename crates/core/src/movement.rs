//! Stock movements (equipment entering or leaving storage).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::equipment::{Category, Location};
use crate::id::EquipmentId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Back into storage.
    #[serde(rename = "ENTRADA")]
    Inbound,
    /// Out of storage, into use.
    #[serde(rename = "SAIDA")]
    Outbound,
}

impl MovementKind {
    /// Moving to an in-use location counts as outbound; anything else is inbound.
    pub fn for_destination(destination: Location) -> Self {
        if destination.is_in_use() {
            MovementKind::Outbound
        } else {
            MovementKind::Inbound
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub equipment_id: EquipmentId,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub kind: MovementKind,
    pub quantity: u32,
    /// Known only for movements of the live population.
    pub origin: Option<Location>,
    pub destination: Location,
}

impl Movement {
    pub fn is_outbound(&self) -> bool {
        self.kind == MovementKind::Outbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_destination() {
        assert_eq!(MovementKind::for_destination(Location::InUseHr), MovementKind::Outbound);
        assert_eq!(MovementKind::for_destination(Location::WarehouseA), MovementKind::Inbound);
        assert_eq!(MovementKind::for_destination(Location::Maintenance), MovementKind::Inbound);
    }
}
