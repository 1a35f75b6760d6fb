use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InventoryError {
    /// A formula input was out of its domain (e.g. non-positive holding cost).
    #[error("invalid inventory input: {0}")]
    InvalidInput(String),
}

impl InventoryError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
