//! Error types for Stockpile.

use thiserror::Error;

use crate::version::SchemaVersion;

/// Top-level error type for Stockpile operations.
#[derive(Debug, Error)]
pub enum StockpileError {
    /// Inventory mutation or query errors
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot written with an unreadable schema version
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version found in the snapshot
        actual: SchemaVersion,
    },
}

/// Argument validation errors.
///
/// These are raised before any mutation and behave identically for the exact
/// and the `try_*` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A quantity argument was zero
    #[error("quantity must be positive")]
    ZeroQuantity,

    /// A stack size argument was zero
    #[error("stack size must be positive")]
    ZeroStackSize,

    /// An index was outside the collection
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Collection length at the time of the call
        len: usize,
    },
}

/// Inventory operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// Adding would exceed a stack's capacity
    #[error("Stack overflow: {current} + {requested} exceeds stack size {capacity}")]
    Overflow {
        /// Stack size in effect
        capacity: u32,
        /// Quantity already held by the offending entry
        current: u32,
        /// Quantity requested
        requested: u32,
    },

    /// A predicate matched no entry
    #[error("No entry matched the predicate")]
    NoMatch,

    /// Not enough quantity to remove
    #[error("Not enough items: need {requested}, have {available}")]
    InsufficientStock {
        /// Quantity requested
        requested: u32,
        /// Quantity available across all matches
        available: u64,
    },

    /// The collection changed while a cursor was walking it
    #[error("Collection modified during iteration (version {expected} -> {found})")]
    ConcurrentModification {
        /// Version captured by the cursor
        expected: u64,
        /// Version found on the collection
        found: u64,
    },
}

impl InventoryError {
    /// Shorthand for an out-of-range index error.
    #[must_use]
    pub const fn out_of_range(index: usize, len: usize) -> Self {
        Self::Validation(ValidationError::IndexOutOfRange { index, len })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse failure
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// RON parse failure
    #[error("Invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// A field failed validation
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Result type alias for Stockpile operations.
pub type StockpileResult<T> = Result<T, StockpileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_inventory_error() {
        let err: InventoryError = ValidationError::ZeroQuantity.into();
        assert_eq!(err, InventoryError::Validation(ValidationError::ZeroQuantity));
        assert_eq!(err.to_string(), "Invalid argument: quantity must be positive");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = InventoryError::out_of_range(7, 3);
        assert_eq!(
            err.to_string(),
            "Invalid argument: index 7 out of range for length 3"
        );
    }

    #[test]
    fn test_inventory_error_wraps_into_top_level() {
        let err: StockpileError = InventoryError::NoMatch.into();
        assert!(matches!(err, StockpileError::Inventory(InventoryError::NoMatch)));
    }

    #[test]
    fn test_version_mismatch_message() {
        let err = StockpileError::VersionMismatch {
            expected: SchemaVersion::SNAPSHOT,
            actual: SchemaVersion::new(2, 1, 0),
        };
        assert_eq!(err.to_string(), "Schema version mismatch: expected 1.0.0, got 2.1.0");
    }
}
