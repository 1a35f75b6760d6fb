//! Equipment records and the fixed label sets attached to them.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::EquipmentId;

/// Implements `label()`, `ALL`, `Display` and `FromStr` for a closed label set.
macro_rules! impl_labels {
    ($t:ident, $name:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $t {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($t::$variant => $label),+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $t::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| DomainError::validation(format!("unknown {}: {s:?}", $name)))
            }
        }
    };
}

/// Coarse health tier of a piece of equipment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentState {
    #[serde(rename = "Novo")]
    New,
    #[serde(rename = "Bom")]
    Good,
    #[serde(rename = "Atenção")]
    Attention,
    #[serde(rename = "Crítico")]
    Critical,
}

impl_labels!(EquipmentState, "state", {
    New => "Novo",
    Good => "Bom",
    Attention => "Atenção",
    Critical => "Crítico",
});

impl EquipmentState {
    /// Derive the state tier from the equipment age in months.
    pub fn from_age(age_months: u32) -> Self {
        match age_months {
            0..=5 => EquipmentState::New,
            6..=23 => EquipmentState::Good,
            24..=47 => EquipmentState::Attention,
            _ => EquipmentState::Critical,
        }
    }

    /// Whether equipment in this state is labelled as needing maintenance.
    pub fn needs_maintenance(&self) -> bool {
        matches!(self, EquipmentState::Attention | EquipmentState::Critical)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Notebook,
    Desktop,
    Monitor,
    #[serde(rename = "Servidor")]
    Server,
    Switch,
    #[serde(rename = "Roteador")]
    Router,
}

impl_labels!(Category, "category", {
    Notebook => "Notebook",
    Desktop => "Desktop",
    Monitor => "Monitor",
    Server => "Servidor",
    Switch => "Switch",
    Router => "Roteador",
});

impl Category {
    /// Only portable equipment reports battery health.
    pub fn has_battery(&self) -> bool {
        matches!(self, Category::Notebook)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Manufacturer {
    Dell,
    #[serde(rename = "HP")]
    Hp,
    Lenovo,
    Cisco,
    Apple,
}

impl_labels!(Manufacturer, "manufacturer", {
    Dell => "Dell",
    Hp => "HP",
    Lenovo => "Lenovo",
    Cisco => "Cisco",
    Apple => "Apple",
});

/// Physical location of a piece of equipment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Almoxarifado A")]
    WarehouseA,
    #[serde(rename = "Almoxarifado B")]
    WarehouseB,
    #[serde(rename = "Em Uso - TI")]
    InUseIt,
    #[serde(rename = "Em Uso - Vendas")]
    InUseSales,
    #[serde(rename = "Em Uso - RH")]
    InUseHr,
    #[serde(rename = "Manutenção")]
    Maintenance,
}

impl_labels!(Location, "location", {
    WarehouseA => "Almoxarifado A",
    WarehouseB => "Almoxarifado B",
    InUseIt => "Em Uso - TI",
    InUseSales => "Em Uso - Vendas",
    InUseHr => "Em Uso - RH",
    Maintenance => "Manutenção",
});

impl Location {
    /// Locations equipment can be assigned to when the population is created.
    pub const INITIAL: &'static [Location] = &[
        Location::WarehouseA,
        Location::WarehouseB,
        Location::InUseIt,
        Location::InUseSales,
        Location::Maintenance,
    ];

    /// Storage locations (inbound movement destinations).
    pub const STORAGE: &'static [Location] = &[Location::WarehouseA, Location::WarehouseB];

    /// In-use locations (outbound movement destinations).
    pub const IN_USE: &'static [Location] =
        &[Location::InUseIt, Location::InUseSales, Location::InUseHr];

    pub fn is_storage(&self) -> bool {
        Self::STORAGE.contains(self)
    }

    pub fn is_in_use(&self) -> bool {
        Self::IN_USE.contains(self)
    }
}

/// A tracked piece of IT equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub rfid: String,
    pub category: Category,
    pub manufacturer: Manufacturer,
    pub model: String,
    pub location: Location,
    pub state: EquipmentState,
    pub age_months: u32,
    pub acquired_on: NaiveDate,
    pub acquisition_value: u32,
    pub in_use: bool,
}
