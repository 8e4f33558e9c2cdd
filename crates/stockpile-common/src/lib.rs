//! # Stockpile Common
//!
//! Shared types for the Stockpile inventory engine:
//! - Error types for inventory operations, configuration and snapshots
//! - Schema versions stamped into serialized containers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::version::*;
}

pub use prelude::*;
