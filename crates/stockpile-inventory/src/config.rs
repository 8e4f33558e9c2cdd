//! Container configuration.
//!
//! ```
//! use stockpile_inventory::config::InventoryConfig;
//!
//! let config = InventoryConfig::from_toml_str("stack_size = 99").unwrap();
//! assert_eq!(config.stack_size, 99);
//! assert_eq!(config.initial_capacity, 0);
//! ```

use serde::{Deserialize, Serialize};
use stockpile_common::ConfigError;

use crate::stacking::DEFAULT_STACK_SIZE;

/// Settings shared by [`StackTable`](crate::table::StackTable) and
/// [`StackList`](crate::list::StackList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Maximum quantity of a single entry.
    pub stack_size: u32,
    /// Number of entries to pre-allocate.
    pub initial_capacity: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            initial_capacity: 0,
        }
    }
}

impl InventoryConfig {
    /// Default settings with the given stack size.
    #[must_use]
    pub fn with_stack_size(stack_size: u32) -> Self {
        Self {
            stack_size,
            ..Self::default()
        }
    }

    /// Set the pre-allocation hint.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stack_size",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate TOML settings. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate RON settings. Missing keys take their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON settings. Missing keys take their defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
