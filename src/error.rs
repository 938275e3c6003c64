// MIT License - Copyright (c) 2026 Peter Wright
// Error types

use crate::constants::Category;

/// All errors that can occur in the econnect bridge library.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The device has no item with this id in the given category.
    #[error("Unknown item: {category} id={id}")]
    UnknownItem { category: Category, id: u32 },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error("Invalid configuration: {details}")]
    Config { details: String },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_item_message() {
        let err = BridgeError::UnknownItem { category: Category::Inputs, id: 7 };
        assert_eq!(err.to_string(), "Unknown item: inputs id=7");
    }

    #[test]
    fn test_snapshot_error_wraps_serde() {
        let err: BridgeError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid snapshot: "));
    }
}
