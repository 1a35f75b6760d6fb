//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a piece of equipment.
///
/// Rendered as `EQ` followed by a zero-padded sequence number (`EQ0001`).
/// Serialized in the rendered form so JSON payloads stay human-readable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EquipmentId(u32);

impl EquipmentId {
    const PREFIX: &'static str = "EQ";

    pub fn new(sequence: u32) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{:04}", Self::PREFIX, self.0)
    }
}

impl FromStr for EquipmentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| DomainError::invalid_id(format!("EquipmentId: missing prefix in {s:?}")))?;
        let sequence = digits
            .parse::<u32>()
            .map_err(|e| DomainError::invalid_id(format!("EquipmentId: {e}")))?;
        Ok(Self(sequence))
    }
}

impl TryFrom<String> for EquipmentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EquipmentId> for String {
    fn from(value: EquipmentId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_zero_padded() {
        assert_eq!(EquipmentId::new(1).to_string(), "EQ0001");
        assert_eq!(EquipmentId::new(123).to_string(), "EQ0123");
    }

    #[test]
    fn parses_rendered_form() {
        let id: EquipmentId = "EQ0042".parse().unwrap();
        assert_eq!(id.sequence(), 42);
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = "0042".parse::<EquipmentId>().unwrap_err();
        match err {
            DomainError::InvalidId(_) => {}
            _ => panic!("Expected InvalidId error"),
        }
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&EquipmentId::new(7)).unwrap();
        assert_eq!(json, "\"EQ0007\"");
        let back: EquipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EquipmentId::new(7));
    }
}
